//! Built-in default dataset
//!
//! Five demo agents and a fixed 27-product catalog. These seed the memory
//! tier and fill empty stores on first start.

use shared::models::{AgentStatus, Dataset, DeliveryAgent, Order, Product};

use super::PersistentStore;

/// Order id prefixes produced by demo/test tooling
const DEMO_ORDER_PREFIXES: [&str; 3] = ["DEMO-", "TEST-", "MOBILE-TEST-"];

/// Customer names produced by demo/test tooling
const DEMO_CUSTOMER_NAMES: [&str; 3] = ["Demo Customer", "Test Customer", "Mobile Test Customer"];

const DEFAULT_MIN_STOCK: u32 = 10;

/// (name, price, category, image, stock)
const DEFAULT_PRODUCTS: [(&str, i64, &str, &str, u32); 27] = [
    ("Fresh Tomatoes", 40, "vegetables", "🍅", 50),
    ("Onions", 30, "vegetables", "🧅", 30),
    ("Potatoes", 25, "vegetables", "🥔", 40),
    ("Carrots", 35, "vegetables", "🥕", 25),
    ("Spinach", 20, "vegetables", "🥬", 20),
    ("Bell Peppers", 60, "vegetables", "🫑", 15),
    ("Bananas", 50, "fruits", "🍌", 30),
    ("Apples", 80, "fruits", "🍎", 25),
    ("Oranges", 70, "fruits", "🍊", 20),
    ("Grapes", 120, "fruits", "🍇", 15),
    ("Mangoes", 100, "fruits", "🥭", 18),
    ("Strawberries", 150, "fruits", "🍓", 12),
    ("Milk (1L)", 60, "dairy", "🥛", 20),
    ("Cheese", 200, "dairy", "🧀", 10),
    ("Yogurt", 45, "dairy", "🍶", 25),
    ("Butter", 80, "dairy", "🧈", 15),
    ("Eggs (12)", 90, "dairy", "🥚", 30),
    ("Rice (1kg)", 80, "grains", "🍚", 40),
    ("Wheat Flour", 50, "grains", "🌾", 35),
    ("Lentils", 120, "grains", "🫘", 25),
    ("Oats", 100, "grains", "🌾", 20),
    ("Quinoa", 200, "grains", "🌾", 15),
    ("Biscuits", 30, "snacks", "🍪", 50),
    ("Chips", 25, "snacks", "🍟", 40),
    ("Nuts Mix", 150, "snacks", "🥜", 20),
    ("Chocolate", 80, "snacks", "🍫", 30),
    ("Candy", 20, "snacks", "🍬", 60),
];

const DEFAULT_AGENTS: [&str; 5] = [
    "Rajesh Kumar",
    "Suresh Singh",
    "Amit Patel",
    "Vikram Sharma",
    "Deepak Gupta",
];

fn unit_for(category: &str) -> &'static str {
    match category {
        "vegetables" | "fruits" | "grains" => "kg",
        "dairy" => "piece",
        _ => "packet",
    }
}

fn supplier_for(category: &str) -> &'static str {
    match category {
        "vegetables" | "fruits" => "Farm Fresh Co",
        "dairy" => "Fresh Foods Ltd",
        "grains" => "Quality Foods Inc",
        _ => "Premium Products Co",
    }
}

/// `CAT-NNN`: first three letters of the category, upper-cased
pub fn sku_for(category: &str, sequence: usize) -> String {
    let prefix: String = category
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    format!("{prefix}-{sequence:03}")
}

pub fn default_products() -> Vec<Product> {
    DEFAULT_PRODUCTS
        .iter()
        .enumerate()
        .map(|(index, &(name, price, category, image, stock))| Product {
            id: index as i64 + 1,
            name: name.to_string(),
            category: category.to_string(),
            price,
            stock,
            min_stock: DEFAULT_MIN_STOCK,
            unit: unit_for(category).to_string(),
            sku: sku_for(category, index + 1),
            supplier: supplier_for(category).to_string(),
            tags: [category.to_string()].into(),
            is_active: true,
            image: Some(image.to_string()),
            cost: Some(price * 3 / 4),
        })
        .collect()
}

pub fn default_agents() -> Vec<DeliveryAgent> {
    DEFAULT_AGENTS
        .iter()
        .enumerate()
        .map(|(index, name)| DeliveryAgent {
            id: index as i64 + 1,
            name: name.to_string(),
            phone: format!("+91 98765 4321{index}"),
            password: "1234".to_string(),
            status: AgentStatus::Available,
            online: true,
            orders_delivered: 0,
            rating: 5.0,
        })
        .collect()
}

pub fn default_dataset() -> Dataset {
    Dataset {
        orders: Vec::new(),
        delivery_boys: default_agents(),
        products: default_products(),
        current_delivery_boy: None,
    }
}

/// Order left behind by demo/test tooling
pub fn is_demo_order(order: &Order) -> bool {
    DEMO_ORDER_PREFIXES
        .iter()
        .any(|prefix| order.order_id.starts_with(prefix))
        || DEMO_CUSTOMER_NAMES.contains(&order.customer_name.as_str())
}

/// Fill empty agent/product lists with defaults and purge demo orders.
///
/// Returns the number of orders removed.
pub fn initialize_defaults(store: &PersistentStore) -> usize {
    let _guard = store.lock();

    let agents = store.agents();
    if agents.is_empty() {
        tracing::info!("Seeding default delivery agents");
        store.set_agents(&default_agents());
    } else {
        store.set_agents(&agents);
    }

    let products = store.products();
    if products.is_empty() {
        tracing::info!("Seeding default products");
        store.set_products(&default_products());
    } else {
        store.set_products(&products);
    }

    let mut orders = store.orders();
    let before = orders.len();
    orders.retain(|order| !is_demo_order(order));
    let removed = before - orders.len();
    if removed > 0 {
        tracing::info!(removed, "Removed demo orders");
    }
    store.set_orders(&orders);

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_shape() {
        let products = default_products();
        assert_eq!(products.len(), 27);
        let ids: HashSet<i64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 27);
        assert_eq!(products[0].name, "Fresh Tomatoes");
        assert_eq!(products[0].sku, "VEG-001");
        assert_eq!(products[26].name, "Candy");
        assert_eq!(products[26].stock, 60);
        assert!(products.iter().all(|p| p.is_active && p.price > 0));
    }

    #[test]
    fn test_default_agents() {
        let agents = default_agents();
        assert_eq!(agents.len(), 5);
        assert_eq!(agents[0].phone, "+91 98765 43210");
        assert_eq!(agents[4].name, "Deepak Gupta");
        assert!(agents.iter().all(|a| a.online && a.rating == 5.0));
    }

    #[test]
    fn test_sku_for() {
        assert_eq!(sku_for("dairy", 7), "DAI-007");
        assert_eq!(sku_for("frozenfoods", 120), "FRO-120");
    }
}
