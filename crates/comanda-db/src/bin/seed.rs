//! # Seed Data Generator
//!
//! Provisions a demo tenant with a realistic menu for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database path
//! cargo run -p comanda-db --bin seed
//!
//! # Specify database path and tenant id
//! cargo run -p comanda-db --bin seed -- --db ./data/comanda.db --tenant barraca-do-ze
//! ```
//!
//! ## Generated Catalog
//! - Drinks with radio-button modifier groups (temperature, sweetener)
//! - A portion with capped extras (cheddar, bacon)
//! - A half-and-half pizza (1-2 flavors, optional stuffed crust)
//! - Açaí sizes with fruit/cream/grain/sweet groups
//! - Marmita configuration with P/M/G sizes and a lunch window
//! - A weekday açaí promotion and an always-on badge

use std::env;

use comanda_core::catalog::{
    Category, Discount, MarmitaConfig, MarmitaSize, ModifierGroup, ModifierOption, OperatingShift,
    Product, Promotion, PromotionTarget, Schedule,
};
use comanda_core::state::TenantState;
use comanda_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn opt(id: &str, name: &str, extra_price_cents: i64) -> ModifierOption {
    ModifierOption {
        id: id.to_string(),
        name: name.to_string(),
        extra_price_cents,
    }
}

fn group(id: &str, name: &str, min: u32, max: u32, options: Vec<ModifierOption>) -> ModifierGroup {
    ModifierGroup {
        id: id.to_string(),
        name: name.to_string(),
        min,
        max,
        options,
    }
}

fn product(
    id: &str,
    tenant_id: &str,
    name: &str,
    price_cents: i64,
    category: Category,
    modifier_groups: Vec<ModifierGroup>,
) -> Product {
    Product {
        id: id.to_string(),
        tenant_id: tenant_id.to_string(),
        name: name.to_string(),
        description: None,
        image: None,
        price_cents,
        category,
        modifier_groups,
    }
}

/// Builds the demo menu.
fn demo_state(tenant_id: &str) -> TenantState {
    let mut state = TenantState::new(tenant_id);
    let t = tenant_id;

    state.catalog.products = vec![
        product(
            "bebida-heineken",
            t,
            "Cerveja Lata (Heineken)",
            1200,
            Category::Bebidas,
            vec![group(
                "bg1",
                "Temperatura",
                1,
                1,
                vec![opt("bo1", "Gelada", 0), opt("bo2", "Natural", 0)],
            )],
        ),
        product(
            "bebida-caipirinha",
            t,
            "Caipirinha Limão",
            2200,
            Category::Bebidas,
            vec![
                group(
                    "bg2",
                    "Adoçante/Açúcar",
                    1,
                    1,
                    vec![
                        opt("bo3", "Com Açúcar", 0),
                        opt("bo4", "Com Adoçante", 0),
                        opt("bo5", "Sem nada", 0),
                    ],
                ),
                group(
                    "bg3",
                    "Extras",
                    0,
                    1,
                    vec![opt("bo6", "Dose Dupla de Álcool", 1200)],
                ),
            ],
        ),
        product(
            "porcao-batata",
            t,
            "Batata Frita",
            3500,
            Category::Porcoes,
            vec![
                group(
                    "pg1",
                    "Adicionais",
                    0,
                    3,
                    vec![
                        opt("po1", "Queijo Cheddar", 800),
                        opt("po2", "Bacon Picado", 600),
                        opt("po3", "Maionese da Casa", 350),
                    ],
                ),
                group(
                    "pg2",
                    "Remover Ingredientes",
                    0,
                    1,
                    vec![opt("po4", "Sem Sal", 0)],
                ),
            ],
        ),
        product(
            "prato-pf-frango",
            t,
            "PF de Frango Grelhado",
            3800,
            Category::Pratos,
            vec![
                group(
                    "dg1",
                    "Ponto do Frango",
                    1,
                    1,
                    vec![
                        opt("do1", "Ao Ponto (Suculento)", 0),
                        opt("do2", "Bem Passado", 0),
                    ],
                ),
                group(
                    "dg2",
                    "Trocar Acompanhamento",
                    0,
                    1,
                    vec![
                        opt("do3", "Trocar Arroz por Integral", 400),
                        opt("do4", "Trocar Fritas por Salada", 0),
                    ],
                ),
            ],
        ),
        product(
            "pizza-gigante",
            t,
            "Pizza Gigante (12 fatias)",
            6500,
            Category::Pizzas,
            vec![
                group(
                    "pz_g1",
                    "Escolha os Sabores (Até 2)",
                    1,
                    2,
                    vec![
                        opt("pzo1", "Calabresa Tradicional", 0),
                        opt("pzo2", "Portuguesa Especial", 500),
                        opt("pzo3", "Frango com Catupiry", 300),
                        opt("pzo4", "Quatro Queijos Premium", 700),
                        opt("pzo5", "Marguerita Gourmet", 0),
                    ],
                ),
                group(
                    "pz_g2",
                    "Borda Recheada",
                    0,
                    1,
                    vec![
                        opt("pzo6", "Borda de Catupiry", 1200),
                        opt("pzo7", "Borda de Chocolate", 1500),
                    ],
                ),
            ],
        ),
        product(
            "acai-pequeno",
            t,
            "Açaí Pequeno (300ml)",
            1500,
            Category::Acai,
            acai_groups(3, 2),
        ),
        product(
            "acai-medio",
            t,
            "Açaí Médio (500ml)",
            2000,
            Category::Acai,
            acai_groups(3, 2),
        ),
        product(
            "acai-grande",
            t,
            "Açaí Grande (700ml)",
            2500,
            Category::Acai,
            acai_groups(4, 3),
        ),
    ];

    state.catalog.promotions = vec![
        Promotion {
            id: "promo-acai-domingo".to_string(),
            tenant_id: t.to_string(),
            title: "Domingo do Açaí".to_string(),
            description: "10% off em toda a linha de açaí".to_string(),
            badge: "PROMO".to_string(),
            color: "#7c3aed".to_string(),
            target: PromotionTarget::Category {
                category: Category::Acai,
            },
            schedule: Schedule::Daily { weekday: 0 },
            discount: Discount::Percentage { bps: 1000 },
            is_active: true,
        },
        Promotion {
            id: "promo-pizza-destaque".to_string(),
            tenant_id: t.to_string(),
            title: "Pizza da Casa".to_string(),
            description: "A favorita dos clientes".to_string(),
            badge: "DESTAQUE".to_string(),
            color: "#f43f5e".to_string(),
            target: PromotionTarget::Product {
                product_id: "pizza-gigante".to_string(),
            },
            schedule: Schedule::Always,
            discount: Discount::BadgeOnly,
            is_active: true,
        },
    ];

    state.catalog.settings.tenant_id = t.to_string();
    state.catalog.settings.company_name = "Barraca do Zé".to_string();
    state.catalog.settings.cnpj = "00.000.000/0001-00".to_string();
    state.catalog.settings.operating_shifts = vec![
        OperatingShift {
            id: "s1".to_string(),
            label: "Almoço Delivery".to_string(),
            start_time: "11:00".to_string(),
            end_time: "15:00".to_string(),
            enabled: true,
        },
        OperatingShift {
            id: "s2".to_string(),
            label: "Jantar Delivery".to_string(),
            start_time: "19:00".to_string(),
            end_time: "03:00".to_string(),
            enabled: true,
        },
    ];
    state.catalog.settings.marmita_config = MarmitaConfig {
        enabled: true,
        daily_menu: "O tempero caseiro que você já conhece.".to_string(),
        ingredients: vec![
            "Arroz Branco".to_string(),
            "Feijão Carioca".to_string(),
            "Frango Grelhado".to_string(),
            "Purê de Batata".to_string(),
            "Salada Verde".to_string(),
        ],
        image: None,
        start_time: "10:30".to_string(),
        end_time: "14:30".to_string(),
        sizes: vec![
            MarmitaSize {
                id: "m1".to_string(),
                label: "P".to_string(),
                price_cents: 1800,
            },
            MarmitaSize {
                id: "m2".to_string(),
                label: "M".to_string(),
                price_cents: 2200,
            },
            MarmitaSize {
                id: "m3".to_string(),
                label: "G".to_string(),
                price_cents: 2800,
            },
        ],
        modifier_groups: vec![group(
            "mg_marm_1",
            "Opcionais Marmita",
            0,
            3,
            vec![
                opt("mo_marm_1", "Ovo Frito Extra", 300),
                opt("mo_marm_2", "Farofa Extra", 150),
                opt("mo_marm_3", "Sem Cebola", 0),
            ],
        )],
    };

    state
}

/// Açaí toppings: fruit, cream, grain and sweet groups with size-scaled caps.
fn acai_groups(fruit_cap: u32, cream_cap: u32) -> Vec<ModifierGroup> {
    vec![
        group(
            "acai_frutas",
            "Escolha suas Frutas",
            0,
            fruit_cap,
            vec![
                opt("fruta_banana", "Banana Fatiada", 200),
                opt("fruta_morango", "Morango Fresco", 300),
                opt("fruta_kiwi", "Kiwi Picado", 350),
                opt("fruta_abacaxi", "Abacaxi em Cubos", 250),
                opt("fruta_manga", "Manga Fresca", 300),
            ],
        ),
        group(
            "acai_cremes",
            "Cremes e Caldas",
            0,
            cream_cap,
            vec![
                opt("creme_leite_ninho", "Creme de Leite Ninho", 400),
                opt("creme_pacoca", "Creme de Paçoca", 400),
                opt("calda_chocolate", "Calda de Chocolate", 200),
                opt("calda_morango", "Calda de Morango", 200),
            ],
        ),
        group(
            "acai_graos",
            "Grãos e Granolas",
            0,
            fruit_cap,
            vec![
                opt("grao_granola_trad", "Granola Tradicional", 200),
                opt("grao_granola_zero", "Granola Zero Açúcar", 250),
                opt("grao_amendoim", "Amendoim Granulado", 200),
                opt("grao_linhaca", "Semente de Linhaça", 150),
            ],
        ),
        group(
            "acai_doces",
            "Doces e Extras",
            0,
            fruit_cap,
            vec![
                opt("doce_leite_cond", "Leite Condensado", 300),
                opt("doce_power_ball", "Power Ball", 350),
                opt("doce_gotas_choc", "Gotas de Chocolate", 300),
                opt("doce_confete", "Confetes Coloridos", 250),
            ],
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Minimal arg parsing: --db <path> --tenant <id>
    let args: Vec<String> = env::args().collect();
    let db_path = arg_value(&args, "--db").unwrap_or_else(|| "./data/comanda.db".to_string());
    let tenant_id = arg_value(&args, "--tenant").unwrap_or_else(|| "barraca-do-ze".to_string());

    info!(db = %db_path, tenant = %tenant_id, "Seeding demo tenant");

    let state = demo_state(&tenant_id);
    state.catalog.validate()?;

    let db = Database::new(DbConfig::new(&db_path)).await?;
    db.snapshots().save(&state).await?;

    info!(
        products = state.catalog.products.len(),
        promotions = state.catalog.promotions.len(),
        marmita_sizes = state.catalog.settings.marmita_config.sizes.len(),
        "Demo tenant seeded"
    );

    db.close().await;
    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
