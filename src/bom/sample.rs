//! Built-in sample estimation data
//!
//! Six panelboards, three of them with breaker/bus-bar children. Used to
//! seed the table when no file has been imported.

use super::item::{ItemType, LineItem};
use super::tree::BomTree;

/// The sample panelboard estimation tree
pub fn panelboard_tree() -> BomTree {
    BomTree::new(panelboard_items())
}

fn panelboard_items() -> Vec<LineItem> {
    vec![
        LineItem::new("H1", "Main Distribution Panel", ItemType::Panel, "480V")
            .header()
            .with_manufacturer("Siemens")
            .with_cost(1200.0)
            .with_children(vec![
                LineItem::new("H1-101", "Main Breaker", ItemType::Breaker, "480V")
                    .with_manufacturer("Siemens")
                    .with_amp_rating(400)
                    .with_cost(350.0),
                LineItem::new("H1-102", "Copper Bus Bar", ItemType::BusBar, "480V")
                    .with_manufacturer("Generic")
                    .with_rating("600A")
                    .with_cost(180.0),
                LineItem::new("H1-103", "Feed Breaker", ItemType::Breaker, "480V")
                    .with_manufacturer("Siemens")
                    .with_amp_rating(100)
                    .with_cost(120.0),
                LineItem::new("H1-104", "Feed Breaker", ItemType::Breaker, "480V")
                    .with_manufacturer("Siemens")
                    .with_amp_rating(60)
                    .with_cost(85.0),
            ]),
        LineItem::new("H2", "Lighting Panel LP-1", ItemType::Panel, "208V")
            .header()
            .with_manufacturer("Square D")
            .with_cost(850.0)
            .with_children(vec![
                LineItem::new("H2-201", "Main Breaker", ItemType::Breaker, "208V")
                    .with_manufacturer("Square D")
                    .with_amp_rating(225)
                    .with_cost(250.0),
                LineItem::new("H2-202", "Aluminum Bus Bar", ItemType::BusBar, "208V")
                    .with_manufacturer("Generic")
                    .with_rating("225A")
                    .with_cost(120.0),
                LineItem::new("H2-203", "Branch Circuit", ItemType::Breaker, "120V")
                    .with_manufacturer("Square D")
                    .with_amp_rating(20)
                    .with_cost(25.0),
                LineItem::new("H2-204", "Branch Circuit", ItemType::Breaker, "120V")
                    .with_manufacturer("Square D")
                    .with_amp_rating(20)
                    .with_cost(25.0),
            ]),
        LineItem::new("H3", "Power Panel PP-1", ItemType::Panel, "208V")
            .header()
            .with_manufacturer("Eaton")
            .with_cost(920.0)
            .with_children(vec![
                LineItem::new("H3-301", "Main Breaker", ItemType::Breaker, "208V")
                    .with_manufacturer("Eaton")
                    .with_amp_rating(200)
                    .with_cost(230.0),
                LineItem::new("H3-302", "Copper Bus Bar", ItemType::BusBar, "208V")
                    .with_manufacturer("Generic")
                    .with_rating("250A")
                    .with_cost(150.0),
                LineItem::new("H3-303", "Feed Breaker", ItemType::Breaker, "208V")
                    .with_manufacturer("Eaton")
                    .with_amp_rating(50)
                    .with_cost(65.0),
                LineItem::new("H3-304", "Feed Breaker", ItemType::Breaker, "208V")
                    .with_manufacturer("Eaton")
                    .with_amp_rating(30)
                    .with_cost(45.0),
            ]),
        LineItem::new("H4", "Emergency Panel EP-1", ItemType::Panel, "480V")
            .header()
            .with_manufacturer("Schneider")
            .with_cost(1050.0),
        LineItem::new("H5", "UPS Distribution Panel", ItemType::Panel, "208V")
            .header()
            .with_manufacturer("ABB")
            .with_cost(1200.0),
        LineItem::new("H6", "Motor Control Center", ItemType::Panel, "480V")
            .header()
            .with_manufacturer("General Electric")
            .with_cost(3500.0),
    ]
}
