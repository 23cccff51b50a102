//! Customer menu composition
//!
//! Pure assembly of the public menu from catalog documents. Nothing here
//! touches storage; handlers load the documents and call [`compose_menu`].

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{BlockKind, Category, DailySpecial, Dish, FeaturedBlock, SpecialMode};
use shared::types::DEFAULT_SORT_ORDER;
use std::collections::{HashMap, HashSet};

/// Section holding dishes without a (known) category
pub const GENERAL_SECTION_NAME: &str = "General";

pub const DEFAULT_SPECIAL_HEADING: &str = "Plato del día";
pub const DEFAULT_SPECIAL_TITLE: &str = "Recomendado del chef";
pub const DEFAULT_SPECIAL_DESCRIPTION: &str = "Selección especial del día elaborada en el momento.";

/// One section of the customer menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuSection {
    /// `None` for the General section
    pub category_id: Option<i64>,
    pub name: String,
    pub sort_order: i32,
    pub dishes: Vec<Dish>,
}

/// Featured block with dish-linked fields resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBlock {
    pub id: i64,
    pub kind: BlockKind,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub dish_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSpecial {
    pub heading: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub dish_id: Option<i64>,
}

/// Menu served to customers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerMenu {
    pub sections: Vec<MenuSection>,
    pub featured: Vec<ResolvedBlock>,
    pub daily_special: Option<ResolvedSpecial>,
}

/// Build the customer menu from catalog documents
pub fn compose_menu(
    categories: Vec<Category>,
    dishes: Vec<Dish>,
    blocks: Vec<FeaturedBlock>,
    daily: Option<DailySpecial>,
) -> CustomerMenu {
    let sections = build_sections(categories, dishes);

    // Dish-linked content only resolves against dishes that are on the menu
    let visible: HashMap<i64, &Dish> = sections
        .iter()
        .flat_map(|s| s.dishes.iter())
        .map(|d| (d.id, d))
        .collect();

    let mut blocks: Vec<FeaturedBlock> = blocks.into_iter().filter(|b| b.is_active).collect();
    blocks.sort_by_key(|b| (b.sort_order, b.id));
    let featured = blocks
        .into_iter()
        .map(|b| resolve_block(b, &visible))
        .collect();

    let daily_special = daily
        .filter(|d| d.is_active)
        .and_then(|d| resolve_special(d, &visible));

    CustomerMenu {
        sections,
        featured,
        daily_special,
    }
}

fn build_sections(categories: Vec<Category>, dishes: Vec<Dish>) -> Vec<MenuSection> {
    let known: HashSet<i64> = categories.iter().map(|c| c.id).collect();

    let mut by_category: HashMap<Option<i64>, Vec<Dish>> = HashMap::new();
    for dish in dishes.into_iter().filter(|d| d.is_active) {
        // Dangling references fall back to General
        let key = dish.category_id.filter(|id| known.contains(id));
        by_category.entry(key).or_default().push(dish);
    }
    for list in by_category.values_mut() {
        list.sort_by_key(|d| (d.sort_order, d.id));
    }

    let mut active: Vec<Category> = categories.into_iter().filter(|c| c.is_active).collect();
    active.sort_by_key(|c| (c.sort_order, c.id));

    let mut sections: Vec<MenuSection> = active
        .into_iter()
        .map(|c| MenuSection {
            dishes: by_category.remove(&Some(c.id)).unwrap_or_default(),
            category_id: Some(c.id),
            name: c.name,
            sort_order: c.sort_order,
        })
        .collect();

    if let Some(general) = by_category.remove(&None)
        && !general.is_empty()
    {
        sections.push(MenuSection {
            category_id: None,
            name: GENERAL_SECTION_NAME.to_string(),
            sort_order: DEFAULT_SORT_ORDER,
            dishes: general,
        });
    }

    sections
}

fn resolve_block(block: FeaturedBlock, dishes: &HashMap<i64, &Dish>) -> ResolvedBlock {
    let linked = match (block.kind, block.dish_id) {
        (BlockKind::Dish, Some(id)) => dishes.get(&id).copied(),
        _ => None,
    };

    match linked {
        Some(dish) => ResolvedBlock {
            id: block.id,
            kind: block.kind,
            title: non_empty(block.title).unwrap_or_else(|| dish.name.clone()),
            description: non_empty(dish.description.clone()),
            price: Some(dish.price),
            image_url: block.image_url,
            dish_id: Some(dish.id),
        },
        None => ResolvedBlock {
            id: block.id,
            kind: block.kind,
            title: block.title,
            description: block.description.and_then(non_empty),
            price: block.manual_price,
            image_url: block.image_url,
            dish_id: block.dish_id,
        },
    }
}

fn resolve_special(daily: DailySpecial, dishes: &HashMap<i64, &Dish>) -> Option<ResolvedSpecial> {
    let heading = daily
        .section_title
        .and_then(non_empty)
        .unwrap_or_else(|| DEFAULT_SPECIAL_HEADING.to_string());

    match daily.mode {
        SpecialMode::Automatic => {
            let dish = dishes.get(&daily.dish_id?)?;
            Some(ResolvedSpecial {
                heading,
                title: dish.name.clone(),
                description: non_empty(dish.description.clone()),
                price: Some(dish.price),
                image_url: dish.image_url.clone(),
                dish_id: Some(dish.id),
            })
        }
        SpecialMode::Manual => Some(ResolvedSpecial {
            heading,
            title: daily
                .manual_title
                .and_then(non_empty)
                .unwrap_or_else(|| DEFAULT_SPECIAL_TITLE.to_string()),
            description: Some(
                daily
                    .manual_description
                    .and_then(non_empty)
                    .unwrap_or_else(|| DEFAULT_SPECIAL_DESCRIPTION.to_string()),
            ),
            price: daily.manual_price,
            image_url: daily.manual_image_url.and_then(non_empty),
            dish_id: None,
        }),
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, sort_order: i32, is_active: bool) -> Category {
        Category {
            id,
            name: name.to_string(),
            sort_order,
            is_active,
        }
    }

    fn dish(id: i64, category_id: Option<i64>, sort_order: i32) -> Dish {
        Dish {
            id,
            name: format!("Plato {id}"),
            description: format!("Descripción {id}"),
            price: Decimal::from(id * 100),
            category_id,
            has_image: false,
            image_url: None,
            is_active: true,
            sort_order,
        }
    }

    fn block(id: i64, kind: BlockKind, sort_order: i32) -> FeaturedBlock {
        FeaturedBlock {
            id,
            is_active: true,
            sort_order,
            kind,
            title: String::new(),
            description: Some("Promo".to_string()),
            manual_price: Some(Decimal::from(999)),
            image_url: None,
            dish_id: None,
            created_at: None,
        }
    }

    #[test]
    fn test_sections_order_and_visibility() {
        let categories = vec![
            category(1, "Postres", 2, true),
            category(2, "Entradas", 1, true),
            category(3, "Oculta", 0, false),
        ];
        let mut hidden = dish(14, Some(1), 0);
        hidden.is_active = false;
        let dishes = vec![
            dish(10, Some(1), 2),
            dish(11, Some(1), 1),
            dish(12, Some(2), 1),
            dish(13, Some(3), 1),
            hidden,
        ];

        let menu = compose_menu(categories, dishes, vec![], None);
        let names: Vec<_> = menu.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Entradas", "Postres"]);

        let postres: Vec<_> = menu.sections[1].dishes.iter().map(|d| d.id).collect();
        assert_eq!(postres, vec![11, 10]);
        assert!(menu.daily_special.is_none());
    }

    #[test]
    fn test_general_section_only_when_needed() {
        let categories = vec![category(1, "Entradas", 1, true)];

        let menu = compose_menu(categories.clone(), vec![dish(10, Some(1), 1)], vec![], None);
        assert_eq!(menu.sections.len(), 1);

        let menu = compose_menu(
            categories,
            vec![dish(10, Some(1), 1), dish(11, None, 2), dish(12, Some(99), 1)],
            vec![],
            None,
        );
        let general = menu.sections.last().unwrap();
        assert_eq!(general.name, GENERAL_SECTION_NAME);
        assert_eq!(general.sort_order, DEFAULT_SORT_ORDER);
        assert!(general.category_id.is_none());
        let ids: Vec<_> = general.dishes.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![12, 11]);
    }

    #[test]
    fn test_featured_blocks_resolution() {
        let mut linked = block(1, BlockKind::Dish, 2);
        linked.dish_id = Some(10);
        let mut titled = block(2, BlockKind::Dish, 1);
        titled.dish_id = Some(10);
        titled.title = "Especial de la casa".to_string();
        let mut missing = block(3, BlockKind::Dish, 3);
        missing.dish_id = Some(404);
        missing.title = "Sin plato".to_string();
        let mut inactive = block(4, BlockKind::Manual, 0);
        inactive.is_active = false;

        let menu = compose_menu(
            vec![],
            vec![dish(10, None, 1)],
            vec![linked, titled, missing, inactive],
            None,
        );

        let ids: Vec<_> = menu.featured.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        assert_eq!(menu.featured[0].title, "Especial de la casa");
        assert_eq!(menu.featured[0].price, Some(Decimal::from(1000)));
        assert_eq!(menu.featured[1].title, "Plato 10");
        assert_eq!(menu.featured[1].description.as_deref(), Some("Descripción 10"));

        // Unresolvable dish keeps the literal content
        assert_eq!(menu.featured[2].title, "Sin plato");
        assert_eq!(menu.featured[2].price, Some(Decimal::from(999)));
    }

    #[test]
    fn test_manual_special_defaults() {
        let daily = DailySpecial {
            mode: SpecialMode::Manual,
            is_active: true,
            manual_price: Some(Decimal::from(7500)),
            ..Default::default()
        };

        let special = compose_menu(vec![], vec![], vec![], Some(daily))
            .daily_special
            .unwrap();
        assert_eq!(special.heading, DEFAULT_SPECIAL_HEADING);
        assert_eq!(special.title, DEFAULT_SPECIAL_TITLE);
        assert_eq!(special.description.as_deref(), Some(DEFAULT_SPECIAL_DESCRIPTION));
        assert_eq!(special.price, Some(Decimal::from(7500)));
    }

    #[test]
    fn test_automatic_special() {
        let daily = DailySpecial {
            mode: SpecialMode::Automatic,
            is_active: true,
            dish_id: Some(10),
            section_title: Some("Sugerencia".to_string()),
            ..Default::default()
        };

        let menu = compose_menu(vec![], vec![dish(10, None, 1)], vec![], Some(daily.clone()));
        let special = menu.daily_special.unwrap();
        assert_eq!(special.heading, "Sugerencia");
        assert_eq!(special.title, "Plato 10");
        assert_eq!(special.dish_id, Some(10));

        // Missing dish or inactive config: nothing shown
        assert!(compose_menu(vec![], vec![], vec![], Some(daily.clone())).daily_special.is_none());
        let off = DailySpecial {
            is_active: false,
            ..daily
        };
        assert!(
            compose_menu(vec![], vec![dish(10, None, 1)], vec![], Some(off))
                .daily_special
                .is_none()
        );
    }
}
