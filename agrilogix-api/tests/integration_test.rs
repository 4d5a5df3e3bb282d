//! End-to-end ledger flows exercised through the domain crates, the way the
//! request handlers drive them: order placement against a listing, farmer
//! confirmation, shipment fulfillment, and a cold-storage stay with
//! temperature excursions.

use agrilogix_catalog::listing::ListingManager;
use agrilogix_catalog::product::{Product, ProductStatus, Unit};
use agrilogix_coldchain::booking::BookingDesk;
use agrilogix_coldchain::models::{
    AlertLevel, BookingStatus, ColdStorageFacility, FacilityStatus,
};
use agrilogix_coldchain::temperature::TemperatureMonitor;
use agrilogix_core::actor::{Actor, Role};
use agrilogix_logistics::board::ShipmentBoard;
use agrilogix_logistics::models::{
    LogisticsRoute, Shipment, ShipmentStatus, Vehicle, VehicleStatus, VehicleType,
};
use agrilogix_order::ledger::OrderLedger;
use agrilogix_order::models::{Order, OrderItem, OrderStatus, PaymentMethod};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn buyer() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Buyer, "Nairobi Fresh Market")
}

fn farmer() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Farmer, "John Kamau")
}

fn driver() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Driver, "James Mwangi")
}

fn tomato_listing() -> Product {
    Product::new(
        Uuid::new_v4(),
        "Tomatoes (Rio Grande)".to_string(),
        dec!(500),
        Unit::Kg,
        dec!(25.00),
        NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
    )
    .unwrap()
}

#[test]
fn order_flow_from_listing_to_completion() {
    let buyer = buyer();
    let farmer = farmer();
    let ledger = OrderLedger::default();

    // Reserve the full listing
    let product = tomato_listing();
    let product_id = product.id;
    let mut listings = ListingManager::new();
    listings.load(product);
    listings.reserve(&product_id, dec!(500)).unwrap();
    assert_eq!(
        listings.get(&product_id).unwrap().status,
        ProductStatus::Sold
    );

    // 500 kg at 25/kg plus 3500 shipping at the 2.5% commission
    let mut order = Order::new(
        buyer.id,
        farmer.id,
        PaymentMethod::Mpesa,
        "Westlands, Nairobi".to_string(),
    );
    order.shipping_cost = dec!(3500);
    let mut items = vec![OrderItem::new(
        order.id,
        product_id,
        "Tomatoes (Rio Grande)".to_string(),
        dec!(500),
        dec!(25.00),
    )];
    ledger.price_order(&mut order, &mut items).unwrap();
    assert_eq!(order.subtotal, dec!(12500.00));
    assert_eq!(order.platform_fee, dec!(312.50));
    assert_eq!(order.total_amount, dec!(16312.50));
    assert_eq!(
        order.total_amount,
        order.subtotal + order.shipping_cost + order.platform_fee
    );

    // Walk the lifecycle to completion
    ledger.confirm(&mut order, &farmer, None).unwrap();
    for status in [
        OrderStatus::PaymentPending,
        OrderStatus::Paid,
        OrderStatus::Processing,
        OrderStatus::Dispatched,
        OrderStatus::Delivered,
        OrderStatus::Completed,
    ] {
        ledger.transition(&mut order, status, &buyer).unwrap();
    }
    assert!(order.completed_at.is_some());
    assert!(order.payment_date.is_some());
    assert_eq!(order.farmer_earnings(), dec!(12187.50));
}

#[test]
fn cancellation_returns_stock_to_the_listing() {
    let buyer = buyer();
    let farmer = farmer();
    let ledger = OrderLedger::default();

    let product = tomato_listing();
    let product_id = product.id;
    let mut listings = ListingManager::new();
    listings.load(product);
    listings.reserve(&product_id, dec!(200)).unwrap();

    let mut order = Order::new(
        buyer.id,
        farmer.id,
        PaymentMethod::Cod,
        "Gikomba Market, Nairobi".to_string(),
    );
    ledger
        .transition(&mut order, OrderStatus::Cancelled, &buyer)
        .unwrap();

    listings.release(&product_id, dec!(200)).unwrap();
    assert_eq!(
        listings.get(&product_id).unwrap().quantity_available,
        dec!(500)
    );
}

#[test]
fn shipment_fulfillment_stamps_and_rates() {
    let driver = driver();
    let board = ShipmentBoard::new();

    let route = LogisticsRoute {
        id: Uuid::new_v4(),
        name: "Nakuru - Nairobi".to_string(),
        origin_name: "Nakuru Town".to_string(),
        destination_name: "Wakulima Market, Nairobi".to_string(),
        distance_km: dec!(158),
        estimated_duration_hours: dec!(3.5),
        base_cost_per_kg: dec!(7.0000),
        is_cold_chain_available: true,
        is_active: true,
    };

    let mut shipment = Shipment::new(
        Uuid::new_v4(),
        "Kamau Mixed Farm, Nakuru".to_string(),
        "Wakulima Market, Nairobi".to_string(),
        Utc::now() - Duration::hours(1),
        dec!(500),
    );
    shipment.shipping_cost = route.quote(shipment.weight_kg);
    assert_eq!(shipment.shipping_cost, dec!(3500.00));

    let vehicle = Vehicle {
        id: Uuid::new_v4(),
        driver_id: driver.id,
        vehicle_type: VehicleType::TruckMedium,
        plate_number: "KDC 412X".to_string(),
        make_model: "Isuzu FRR".to_string(),
        year: 2021,
        capacity_kg: dec!(5000),
        is_refrigerated: false,
        refrigeration_min_temp: None,
        refrigeration_max_temp: None,
        insurance_expiry: NaiveDate::from_ymd_opt(2027, 1, 31).unwrap(),
        inspection_expiry: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
        status: VehicleStatus::Available,
        current_latitude: None,
        current_longitude: None,
        last_location_update: None,
        created_at: Utc::now(),
    };

    board.assign(&mut shipment, &driver, &vehicle).unwrap();
    let picked = Utc::now();
    board
        .update_status(&mut shipment, ShipmentStatus::PickedUp, &driver, picked)
        .unwrap();
    board
        .update_status(
            &mut shipment,
            ShipmentStatus::InTransit,
            &driver,
            picked + Duration::minutes(10),
        )
        .unwrap();
    board
        .update_status(
            &mut shipment,
            ShipmentStatus::Delivered,
            &driver,
            picked + Duration::hours(4),
        )
        .unwrap();

    assert_eq!(shipment.actual_pickup, Some(picked));
    assert!(shipment.actual_delivery.unwrap() >= shipment.actual_pickup.unwrap());

    board.rate_driver(&mut shipment, 5).unwrap();
    assert_eq!(shipment.driver_rating, Some(5));
}

#[test]
fn cold_storage_stay_with_excursions() {
    let operator = Actor::new(Uuid::new_v4(), Role::ColdStorage, "Arctic Cold Kenya Ltd");
    let farmer = farmer();
    let desk = BookingDesk::new();

    let mut facility = ColdStorageFacility {
        id: Uuid::new_v4(),
        operator_id: operator.id,
        name: "Arctic Cold Kenya - Nairobi Hub".to_string(),
        location_name: "Industrial Area, Nairobi".to_string(),
        latitude: dec!(-1.3031),
        longitude: dec!(36.8516),
        total_capacity_tonnes: dec!(500),
        available_capacity_tonnes: dec!(180),
        min_temperature_celsius: -2,
        max_temperature_celsius: 8,
        cost_per_tonne_per_day: dec!(850.00),
        has_backup_generator: true,
        certification: Some("KEBS Certified Cold Chain".to_string()),
        status: FacilityStatus::Operational,
        is_active: true,
        created_at: Utc::now(),
    };

    // 8 tonnes at 850/tonne/day over a 7-day stay
    let mut booking = desk
        .request(
            &facility,
            &farmer,
            "French beans for export".to_string(),
            dec!(8.0),
            2,
            6,
            NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 17).unwrap(),
        )
        .unwrap();
    assert_eq!(booking.total_cost, dec!(47600.00));

    desk.confirm(&mut booking, &mut facility, &operator).unwrap();
    assert_eq!(facility.available_capacity_tonnes, dec!(172));
    assert_eq!(facility.utilization_percent(), dec!(65.6));
    desk.activate(&mut booking).unwrap();

    // Sensor trail: normal, warning, critical against the 2..=6 band
    let monitor = TemperatureMonitor::default();
    let levels: Vec<AlertLevel> = [dec!(3.1), dec!(7.2), dec!(14.3)]
        .iter()
        .map(|t| {
            monitor
                .record_for_booking(&booking, "SNSR-NAI-001".to_string(), *t, None)
                .alert_level
        })
        .collect();
    assert_eq!(
        levels,
        vec![AlertLevel::Normal, AlertLevel::Warning, AlertLevel::Critical]
    );

    desk.close(&mut booking, &mut facility, BookingStatus::Completed)
        .unwrap();
    assert_eq!(facility.available_capacity_tonnes, dec!(180));
    assert_eq!(booking.status, BookingStatus::Completed);
}

#[test]
fn utilization_has_no_division_by_zero() {
    let facility = ColdStorageFacility {
        id: Uuid::new_v4(),
        operator_id: Uuid::new_v4(),
        name: "Unprovisioned Hub".to_string(),
        location_name: "Eldoret".to_string(),
        latitude: dec!(0.5143),
        longitude: dec!(35.2698),
        total_capacity_tonnes: Decimal::ZERO,
        available_capacity_tonnes: Decimal::ZERO,
        min_temperature_celsius: 2,
        max_temperature_celsius: 8,
        cost_per_tonne_per_day: dec!(650.00),
        has_backup_generator: false,
        certification: None,
        status: FacilityStatus::Offline,
        is_active: false,
        created_at: Utc::now(),
    };
    assert_eq!(facility.utilization_percent(), Decimal::ZERO);
}
