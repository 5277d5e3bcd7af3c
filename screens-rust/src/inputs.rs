//! Quality input marketplace: verified suppliers, products and favourites.

use crate::{
    filter::{filter_records, FilterCriteria, Filterable},
    loader::{Endpoint, LoadOutcome, Loader},
    ScreenOptions,
};
use agri_portal_sdk::{
    api, PortalBackend, PortalResult, ProductCatalog, QualityInputListing, SupplierProfile,
};
use futures::future::BoxFuture;
use rand::{rngs::StdRng, Rng, SeedableRng};

const DEFAULT_SUPPLIER_RATING: f64 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceRange {
    Budget,
    #[default]
    MidRange,
    Premium,
}

impl PriceRange {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Budget" => Some(Self::Budget),
            "Mid-range" => Some(Self::MidRange),
            "Premium" => Some(Self::Premium),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::MidRange => "Mid-range",
            Self::Premium => "Premium",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// Seeds, Fertilizers, Equipment or Pesticides.
    pub category: String,
    pub contact: String,
    pub location: String,
    pub rating: f64,
    pub verified: bool,
    pub specializations: Vec<String>,
    pub price_range: PriceRange,
    pub description: String,
}

impl Filterable for Supplier {
    fn category(&self) -> &str {
        &self.category
    }

    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.specializations.iter().map(String::as_str));
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub supplier: String,
    /// Rupees per `unit`.
    pub price: f64,
    pub unit: String,
    pub rating: f64,
    pub in_stock: bool,
    pub organic: bool,
    pub description: String,
}

impl Filterable for Product {
    fn category(&self) -> &str {
        &self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

pub fn suppliers_loader() -> Loader<Supplier> {
    Loader::new(Endpoint::new(api::SUPPLIERS_PATH, fetch_suppliers))
        .with_secondary(Endpoint::new(api::QUALITY_INPUT_PATH, fetch_quality_input))
        .with_fallback(demo_suppliers)
}

pub fn products_loader() -> Loader<Product> {
    Loader::new(Endpoint::new(api::PRODUCTS_PATH, fetch_products)).with_fallback(demo_products)
}

fn fetch_suppliers<'a>(
    backend: &'a dyn PortalBackend,
    rng: &'a mut StdRng,
) -> BoxFuture<'a, PortalResult<Vec<Supplier>>> {
    Box::pin(async move {
        let suppliers = api::suppliers(backend).await?;
        Ok(map_suppliers(suppliers, rng))
    })
}

fn fetch_quality_input<'a>(
    backend: &'a dyn PortalBackend,
    rng: &'a mut StdRng,
) -> BoxFuture<'a, PortalResult<Vec<Supplier>>> {
    Box::pin(async move {
        let listing = api::quality_input(backend).await?;
        Ok(map_quality_input(listing, rng))
    })
}

fn fetch_products<'a>(
    backend: &'a dyn PortalBackend,
    _rng: &'a mut StdRng,
) -> BoxFuture<'a, PortalResult<Vec<Product>>> {
    Box::pin(async move {
        let catalog = api::products(backend).await?;
        Ok(map_products(catalog))
    })
}

fn map_suppliers(suppliers: Vec<SupplierProfile>, rng: &mut StdRng) -> Vec<Supplier> {
    suppliers
        .into_iter()
        .map(|supplier| Supplier {
            id: supplier.id.to_string(),
            rating: supplier.rating.unwrap_or(DEFAULT_SUPPLIER_RATING),
            verified: supplier.verified.unwrap_or(true),
            specializations: supplier
                .specializations
                .unwrap_or_else(|| specializations_for(&supplier.category)),
            price_range: supplier
                .price_range
                .as_deref()
                .and_then(PriceRange::parse)
                .unwrap_or_default(),
            description: supplier
                .description
                .unwrap_or_else(|| generated_description(&supplier.category, rng)),
            name: supplier.name,
            category: supplier.category,
            contact: supplier.contact,
            location: supplier.location,
        })
        .collect()
}

fn map_quality_input(listing: QualityInputListing, rng: &mut StdRng) -> Vec<Supplier> {
    listing
        .suppliers
        .into_iter()
        .enumerate()
        .map(|(index, supplier)| Supplier {
            id: index.to_string(),
            rating: supplier.rating.unwrap_or(DEFAULT_SUPPLIER_RATING),
            verified: true,
            specializations: specializations_for(&supplier.category),
            price_range: match index % 3 {
                0 => PriceRange::Premium,
                1 => PriceRange::MidRange,
                _ => PriceRange::Budget,
            },
            description: generated_description(&supplier.category, rng),
            name: supplier.name,
            category: supplier.category,
            contact: supplier.contact,
            location: supplier.location,
        })
        .collect()
}

fn map_products(catalog: ProductCatalog) -> Vec<Product> {
    catalog
        .products
        .into_iter()
        .map(|product| Product {
            id: product.id.to_string(),
            name: product.name,
            category: product.category,
            supplier: product.supplier,
            price: product.price,
            unit: product.unit,
            rating: product.rating,
            in_stock: product.in_stock,
            organic: product.organic,
            description: product.description,
        })
        .collect()
}

fn specializations_for(category: &str) -> Vec<String> {
    let specializations: &[&str] = match category {
        "Seeds" => &["Hybrid Varieties", "Organic Seeds", "Disease Resistant"],
        "Fertilizers" => &["NPK Complex", "Organic Compost", "Micronutrients"],
        "Equipment" => &["Irrigation", "Harvesting", "Soil Preparation"],
        "Pesticides" => &["Bio-pesticides", "Fungicides", "Herbicides"],
        _ => &[],
    };
    specializations.iter().map(|s| (*s).to_string()).collect()
}

fn generated_description(category: &str, rng: &mut StdRng) -> String {
    format!(
        "Trusted supplier of quality {} with {} years of experience.",
        category.to_lowercase(),
        rng.gen_range(5..15)
    )
}

#[must_use]
pub fn demo_suppliers() -> Vec<Supplier> {
    vec![
        Supplier {
            id: "1".into(),
            name: "AgriSeeds Pro".into(),
            category: "Seeds".into(),
            contact: "9876543210".into(),
            location: "Delhi".into(),
            rating: 4.5,
            verified: true,
            specializations: vec!["Hybrid Varieties".into(), "Disease Resistant".into()],
            price_range: PriceRange::Premium,
            description: "Leading supplier of certified seeds with 15 years of experience.".into(),
        },
        Supplier {
            id: "2".into(),
            name: "FarmTech Solutions".into(),
            category: "Fertilizers".into(),
            contact: "9876543211".into(),
            location: "Mumbai".into(),
            rating: 4.2,
            verified: true,
            specializations: vec!["NPK Complex".into(), "Micronutrients".into()],
            price_range: PriceRange::MidRange,
            description: "Quality fertilizers and soil enhancement solutions.".into(),
        },
    ]
}

#[must_use]
pub fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".into(),
            name: "Premium Wheat Seeds (HD-2967)".into(),
            category: "Seeds".into(),
            supplier: "AgriSeeds Pro".into(),
            price: 45.0,
            unit: "kg".into(),
            rating: 4.6,
            in_stock: true,
            organic: false,
            description: "High-yielding, disease-resistant wheat variety".into(),
        },
        Product {
            id: "2".into(),
            name: "Organic NPK Fertilizer".into(),
            category: "Fertilizers".into(),
            supplier: "FarmTech Solutions".into(),
            price: 1200.0,
            unit: "50kg bag".into(),
            rating: 4.4,
            in_stock: true,
            organic: true,
            description: "Complete nutrition for all crops".into(),
        },
        Product {
            id: "3".into(),
            name: "Drip Irrigation Kit".into(),
            category: "Equipment".into(),
            supplier: "Green Harvest".into(),
            price: 15000.0,
            unit: "set".into(),
            rating: 4.7,
            in_stock: true,
            organic: false,
            description: "Water-efficient irrigation system for 1 acre".into(),
        },
    ]
}

/// State of the quality input screen for one mount.
pub struct InputMarketScreen {
    suppliers: LoadOutcome<Supplier>,
    products: LoadOutcome<Product>,
    favorites: Vec<String>,
    criteria: FilterCriteria,
}

impl InputMarketScreen {
    /// Load suppliers and products concurrently.
    pub async fn mount(backend: &dyn PortalBackend, options: ScreenOptions) -> Self {
        let mut rng = options.rng();
        let mut supplier_rng = StdRng::seed_from_u64(rng.gen());
        let mut product_rng = StdRng::seed_from_u64(rng.gen());

        let suppliers_loader = suppliers_loader();
        let products_loader = products_loader();
        let (suppliers, products) = futures::join!(
            suppliers_loader.load(backend, &mut supplier_rng),
            products_loader.load(backend, &mut product_rng),
        );

        Self {
            suppliers,
            products,
            favorites: Vec::new(),
            criteria: FilterCriteria::default(),
        }
    }

    pub fn suppliers(&self) -> &[Supplier] {
        self.suppliers.records()
    }

    pub fn suppliers_outcome(&self) -> &LoadOutcome<Supplier> {
        &self.suppliers
    }

    pub fn products(&self) -> &[Product] {
        self.products.records()
    }

    pub fn products_outcome(&self) -> &LoadOutcome<Product> {
        &self.products
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.criteria.search = search.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.criteria.category = category.into();
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.criteria.location = location.into();
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

    pub fn filtered_suppliers(&self) -> Vec<&Supplier> {
        filter_records(self.suppliers(), &self.criteria)
    }

    /// Products matching the search and category. Products carry no
    /// location, so the location criterion does not narrow them.
    pub fn filtered_products(&self) -> Vec<&Product> {
        filter_records(self.products(), &self.criteria)
    }

    /// Add `supplier_id` to the favourites, or remove it if present.
    /// Returns whether the supplier is a favourite afterwards.
    pub fn toggle_favorite(&mut self, supplier_id: &str) -> bool {
        if let Some(position) = self.favorites.iter().position(|id| id == supplier_id) {
            self.favorites.remove(position);
            false
        } else {
            self.favorites.push(supplier_id.to_string());
            true
        }
    }

    pub fn is_favorite(&self, supplier_id: &str) -> bool {
        self.favorites.iter().any(|id| id == supplier_id)
    }

    /// Favourite supplier ids in the order they were added.
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }
}
