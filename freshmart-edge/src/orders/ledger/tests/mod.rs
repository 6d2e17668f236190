use super::*;
use crate::agents::SharedSecretAuthenticator;
use shared::models::{AgentStatus, CartItem, DeliveryTime};

struct Fixture {
    store: Arc<PersistentStore>,
    catalog: CatalogRepository,
    agents: AgentDirectory,
    ledger: OrderLedger,
}

fn create_fixture() -> Fixture {
    let store = Arc::new(PersistentStore::in_memory());
    let catalog = CatalogRepository::new(store.clone());
    let agents = AgentDirectory::new(store.clone());
    let ledger = OrderLedger::new(store.clone(), catalog.clone(), agents.clone());
    Fixture {
        store,
        catalog,
        agents,
        ledger,
    }
}

fn cart_item(product_id: i64, name: &str, price: i64, quantity: u32) -> CartItem {
    CartItem {
        id: product_id,
        name: name.to_string(),
        price,
        image: None,
        quantity,
    }
}

fn draft(items: Vec<CartItem>) -> OrderDraft {
    OrderDraft {
        customer_name: "Asha Rao".to_string(),
        customer_phone: "98450 12345".to_string(),
        delivery_address: "12 Market Road, Pune".to_string(),
        delivery_time: DeliveryTime::OneHour,
        items,
    }
}

/// 2 × Fresh Tomatoes (40) + 1 × Milk (60) = 140
fn place_order(fixture: &Fixture) -> Order {
    fixture
        .ledger
        .create(draft(vec![
            cart_item(1, "Fresh Tomatoes", 40, 2),
            cart_item(13, "Milk (1L)", 60, 1),
        ]))
        .unwrap()
}

fn agent_status(fixture: &Fixture, agent_id: i64) -> AgentStatus {
    fixture.agents.by_id(agent_id).unwrap().status
}

mod test_boundary;
