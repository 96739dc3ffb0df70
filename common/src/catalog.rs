//! The static food catalog. Loaded once, never mutated.

use crate::types::{Category, CategoryFilter, FoodItem};
use std::sync::LazyLock;

static CATALOG: LazyLock<Vec<FoodItem>> = LazyLock::new(|| {
    vec![
        item(
            "1",
            "Classic Cheeseburger",
            "Juicy beef patty with melted cheddar, lettuce, and our secret sauce.",
            12.99,
            Category::Burgers,
            "https://picsum.photos/seed/burger1/400/300",
            850,
            4.8,
            &["Comfort", "Classic", "Beef"],
        ),
        item(
            "2",
            "Truffle Mushroom Pizza",
            "Wild mushrooms, truffle oil, and fresh mozzarella on a thin crust.",
            18.50,
            Category::Pizza,
            "https://picsum.photos/seed/pizza1/400/300",
            1100,
            4.9,
            &["Vegetarian", "Premium", "Italian"],
        ),
        item(
            "3",
            "Dragon Roll Sushi",
            "Shrimp tempura, eel, avocado, and spicy mayo topping.",
            15.99,
            Category::Sushi,
            "https://picsum.photos/seed/sushi1/400/300",
            450,
            4.7,
            &["Seafood", "Spicy", "Japanese"],
        ),
        item(
            "4",
            "Quinoa Power Bowl",
            "Fresh kale, quinoa, roasted sweet potatoes, and tahini dressing.",
            13.50,
            Category::Salads,
            "https://picsum.photos/seed/salad1/400/300",
            520,
            4.6,
            &["Healthy", "Vegan", "Gluten-Free"],
        ),
        item(
            "5",
            "Double Choco Lava Cake",
            "Warm chocolate cake with a gooey center served with vanilla ice cream.",
            8.99,
            Category::Desserts,
            "https://picsum.photos/seed/cake1/400/300",
            780,
            4.9,
            &["Sweet", "Indulgent"],
        ),
        item(
            "6",
            "Hibiscus Iced Tea",
            "Refreshing brewed hibiscus tea with a hint of mint and lime.",
            4.50,
            Category::Drinks,
            "https://picsum.photos/seed/drink1/400/300",
            80,
            4.5,
            &["Refreshing", "Sugar-Free"],
        ),
        item(
            "7",
            "Spicy Buffalo Wings",
            "Crispy wings tossed in fiery buffalo sauce with ranch dip.",
            14.25,
            Category::Burgers,
            "https://picsum.photos/seed/wings/400/300",
            900,
            4.7,
            &["Spicy", "Appetizer"],
        ),
        item(
            "8",
            "Margherita Flatbread",
            "San Marzano tomatoes, fresh basil, and buffalo mozzarella.",
            14.99,
            Category::Pizza,
            "https://picsum.photos/seed/margherita/400/300",
            700,
            4.5,
            &["Vegetarian", "Light"],
        ),
    ]
});

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    name: &str,
    description: &str,
    price: f64,
    category: Category,
    image: &str,
    calories: u32,
    rating: f32,
    tags: &[&str],
) -> FoodItem {
    FoodItem {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category,
        image: image.to_string(),
        calories,
        rating,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn catalog() -> &'static [FoodItem] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static FoodItem> {
    CATALOG.iter().find(|i| i.id == id)
}

/// Items in `filter`'s category whose name or description contains
/// `search`, ignoring case. An empty search matches everything.
pub fn filter<'a>(items: &'a [FoodItem], filter: CategoryFilter, search: &str) -> Vec<&'a FoodItem> {
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|i| filter.matches(i.category))
        .filter(|i| {
            i.name.to_lowercase().contains(&needle) || i.description.to_lowercase().contains(&needle)
        })
        .collect()
}
