//! Loads a realistic Kenyan demo dataset: farms in the Rift Valley and around
//! Lake Victoria, produce listings, haulage routes, cold stores and a worked
//! order. Run against an empty database.

use agrilogix_catalog::farm::{Farm, FarmType};
use agrilogix_catalog::product::{Product, Unit};
use agrilogix_catalog::repository::{FarmRepository, ProductRepository};
use agrilogix_coldchain::booking::BookingDesk;
use agrilogix_coldchain::models::{ColdStorageFacility, FacilityStatus};
use agrilogix_coldchain::repository::ColdChainRepository;
use agrilogix_coldchain::temperature::TemperatureMonitor;
use agrilogix_core::actor::{Actor, Role};
use agrilogix_logistics::models::{LogisticsRoute, Vehicle, VehicleStatus, VehicleType};
use agrilogix_logistics::repository::ShipmentRepository;
use agrilogix_order::ledger::OrderLedger;
use agrilogix_order::models::{Order, OrderItem, PaymentMethod};
use agrilogix_order::repository::OrderRepository;
use agrilogix_store::{
    DbClient, PostgresCatalogRepository, PostgresColdChainRepository, PostgresOrderRepository,
    PostgresShipmentRepository,
};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = agrilogix_store::app_config::Config::load().expect("Failed to load config");
    let db = DbClient::new(&config.database.url).await?;
    db.migrate().await?;

    let catalog = PostgresCatalogRepository {
        pool: db.pool.clone(),
    };
    let orders = PostgresOrderRepository {
        pool: db.pool.clone(),
    };
    let shipments = PostgresShipmentRepository {
        pool: db.pool.clone(),
    };
    let coldchain = PostgresColdChainRepository {
        pool: db.pool.clone(),
    };

    tracing::info!("Seeding business rules...");
    sqlx::query(
        r#"
        INSERT INTO business_rules (rule_key, rule_value)
        VALUES ('platform_fee_bps', '{"value": 250}')
        ON CONFLICT (rule_key) DO NOTHING
        "#,
    )
    .execute(&db.pool)
    .await?;

    tracing::info!("Seeding categories...");
    let vegetables = Uuid::new_v4();
    let cereals = Uuid::new_v4();
    for (id, name, cold, min_t, max_t) in [
        (vegetables, "Vegetables", true, Some(2), Some(8)),
        (Uuid::new_v4(), "Fruits", true, Some(4), Some(10)),
        (cereals, "Cereals & Grains", false, None, None),
    ] {
        sqlx::query(
            r#"
            INSERT INTO product_categories (id, name, requires_cold_chain, min_temp_celsius,
                                            max_temp_celsius)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(cold)
        .bind(min_t)
        .bind(max_t)
        .execute(&db.pool)
        .await?;
    }

    tracing::info!("Seeding farms and products...");
    let kamau = Actor::new(Uuid::new_v4(), Role::Farmer, "John Kamau");
    let wanjiku = Actor::new(Uuid::new_v4(), Role::Farmer, "Grace Wanjiku");

    let kamau_farm = Farm::register(
        &kamau,
        "Kamau Mixed Farm".to_string(),
        FarmType::Mixed,
        Decimal::new(125, 1),
        "Nakuru County".to_string(),
        Decimal::new(-3031, 4),
        Decimal::new(360800, 4),
        "Nakuru".to_string(),
    )
    .expect("seed farm");
    catalog.create_farm(&kamau_farm).await.map_err(anyhow_err)?;

    let wanjiku_farm = Farm::register(
        &wanjiku,
        "Wanjiku Horticulture".to_string(),
        FarmType::Vegetable,
        Decimal::new(48, 1),
        "Murang'a County".to_string(),
        Decimal::new(-7173, 4),
        Decimal::new(371500, 4),
        "Murang'a".to_string(),
    )
    .expect("seed farm");
    catalog
        .create_farm(&wanjiku_farm)
        .await
        .map_err(anyhow_err)?;

    let mut tomatoes = Product::new(
        kamau_farm.id,
        "Tomatoes (Rio Grande)".to_string(),
        Decimal::from(500),
        Unit::Kg,
        Decimal::new(2500, 2),
        NaiveDate::from_ymd_opt(2026, 7, 20).unwrap(),
    )
    .expect("seed product");
    tomatoes.category_id = Some(vegetables);
    catalog.create_product(&tomatoes).await.map_err(anyhow_err)?;

    let mut maize = Product::new(
        kamau_farm.id,
        "Maize (90kg bags)".to_string(),
        Decimal::from(60),
        Unit::Bag,
        Decimal::new(420000, 2),
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
    )
    .expect("seed product");
    maize.category_id = Some(cereals);
    catalog.create_product(&maize).await.map_err(anyhow_err)?;

    let mut beans = Product::new(
        wanjiku_farm.id,
        "French Beans".to_string(),
        Decimal::from(200),
        Unit::Kg,
        Decimal::new(8000, 2),
        NaiveDate::from_ymd_opt(2026, 7, 28).unwrap(),
    )
    .expect("seed product");
    beans.category_id = Some(vegetables);
    beans.minimum_order_quantity = Decimal::from(10);
    catalog.create_product(&beans).await.map_err(anyhow_err)?;

    tracing::info!("Seeding logistics...");
    let driver = Actor::new(Uuid::new_v4(), Role::Driver, "James Mwangi");
    let route = LogisticsRoute {
        id: Uuid::new_v4(),
        name: "Nakuru - Nairobi".to_string(),
        origin_name: "Nakuru Town".to_string(),
        destination_name: "Wakulima Market, Nairobi".to_string(),
        distance_km: Decimal::from(158),
        estimated_duration_hours: Decimal::new(35, 1),
        base_cost_per_kg: Decimal::new(70000, 4),
        is_cold_chain_available: true,
        is_active: true,
    };
    sqlx::query(
        r#"
        INSERT INTO logistics_routes (id, name, origin_name, destination_name, distance_km,
                                      estimated_duration_hours, base_cost_per_kg,
                                      is_cold_chain_available, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(route.id)
    .bind(&route.name)
    .bind(&route.origin_name)
    .bind(&route.destination_name)
    .bind(route.distance_km)
    .bind(route.estimated_duration_hours)
    .bind(route.base_cost_per_kg)
    .bind(route.is_cold_chain_available)
    .bind(route.is_active)
    .execute(&db.pool)
    .await?;

    let reefer = Vehicle {
        id: Uuid::new_v4(),
        driver_id: driver.id,
        vehicle_type: VehicleType::Refrigerated,
        plate_number: "KDC 412X".to_string(),
        make_model: "Isuzu FRR Reefer".to_string(),
        year: 2021,
        capacity_kg: Decimal::from(5000),
        is_refrigerated: true,
        refrigeration_min_temp: Some(-2),
        refrigeration_max_temp: Some(8),
        insurance_expiry: NaiveDate::from_ymd_opt(2027, 1, 31).unwrap(),
        inspection_expiry: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
        status: VehicleStatus::Available,
        current_latitude: None,
        current_longitude: None,
        last_location_update: None,
        created_at: Utc::now(),
    };
    shipments.create_vehicle(&reefer).await.map_err(anyhow_err)?;

    tracing::info!("Seeding cold storage...");
    let operator = Actor::new(Uuid::new_v4(), Role::ColdStorage, "Arctic Cold Kenya Ltd");
    let facility = ColdStorageFacility {
        id: Uuid::new_v4(),
        operator_id: operator.id,
        name: "Arctic Cold Kenya - Nairobi Hub".to_string(),
        location_name: "Industrial Area, Nairobi".to_string(),
        latitude: Decimal::new(-13031, 4),
        longitude: Decimal::new(368516, 4),
        total_capacity_tonnes: Decimal::from(500),
        available_capacity_tonnes: Decimal::from(180),
        min_temperature_celsius: -2,
        max_temperature_celsius: 8,
        cost_per_tonne_per_day: Decimal::new(85000, 2),
        has_backup_generator: true,
        certification: Some("KEBS Certified Cold Chain".to_string()),
        status: FacilityStatus::Operational,
        is_active: true,
        created_at: Utc::now(),
    };
    coldchain
        .create_facility(&facility)
        .await
        .map_err(anyhow_err)?;

    tracing::info!("Seeding market prices...");
    for (market, product, price) in [
        ("Wakulima Market, Nairobi", "Tomatoes", 3000i64),
        ("Wakulima Market, Nairobi", "French Beans", 9500),
        ("Kibuye Market, Kisumu", "Maize", 4300_00),
    ] {
        sqlx::query(
            r#"
            INSERT INTO market_price_index (id, market, product_name, price_per_kg, recorded_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(market)
        .bind(product)
        .bind(Decimal::new(price, 2))
        .bind(Utc::now().date_naive())
        .execute(&db.pool)
        .await?;
    }

    tracing::info!("Seeding a worked order...");
    let buyer = Actor::new(Uuid::new_v4(), Role::Buyer, "Nairobi Fresh Market");
    let mut order = Order::new(
        buyer.id,
        kamau.id,
        PaymentMethod::Mpesa,
        "Westlands, Nairobi".to_string(),
    );
    order.shipping_cost = route.quote(Decimal::from(500));
    let mut items = vec![OrderItem::new(
        order.id,
        tomatoes.id,
        tomatoes.name.clone(),
        Decimal::from(500),
        tomatoes.price_per_unit,
    )];
    items[0].requires_cold_chain = true;
    OrderLedger::default()
        .price_order(&mut order, &mut items)
        .expect("seed order pricing");
    orders.create_order(&order, &items).await.map_err(anyhow_err)?;

    let booking = BookingDesk::new()
        .request(
            &facility,
            &kamau,
            "Tomatoes awaiting dispatch".to_string(),
            Decimal::new(5, 1),
            2,
            8,
            Utc::now().date_naive(),
            (Utc::now() + Duration::days(3)).date_naive(),
        )
        .expect("seed booking");
    coldchain.create_booking(&booking).await.map_err(anyhow_err)?;

    let monitor = TemperatureMonitor::default();
    for temp in [31i64, 34, 29, 58, 102] {
        let log = monitor.record_for_booking(
            &booking,
            "SNSR-NAI-001".to_string(),
            Decimal::new(temp, 1),
            Some(Decimal::from(90)),
        );
        coldchain.add_temperature_log(&log).await.map_err(anyhow_err)?;
    }

    tracing::info!(
        "Seeding complete: order {} totals KES {}",
        order.order_number,
        order.total_amount
    );
    Ok(())
}

fn anyhow_err(err: Box<dyn std::error::Error + Send + Sync>) -> anyhow::Error {
    anyhow::anyhow!(err.to_string())
}
