// ABOUTME: Static vocabulary tables for query understanding
// ABOUTME: Negation markers, meal and category synonyms, nutrients, ingredients, and dishes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Vocabulary tables. Order is significant wherever the parser takes the first
//! match (meal types, dish names) and for the order of extracted lists.

use recipe_core::models::{MealType, Nutrient};

/// Words and phrases that negate an ingredient mentioned shortly after them
pub const NEGATION_MARKERS: &[&str] = &[
    "without", "no", "avoid", "exclude", "not", "don't", "dont", "doesn't", "doesnt", "never",
    "none", "free", "skip", "minus", "except", "hold", "leave out", "but no", "and no",
    "does not", "do not",
];

/// Meal types with their trigger keywords; first match wins
pub const MEAL_TYPE_SYNONYMS: &[(MealType, &[&str])] = &[
    (MealType::Breakfast, &["breakfast", "brunch", "morning"]),
    (MealType::Lunch, &["lunch", "midday", "noon"]),
    (MealType::Dinner, &["dinner", "supper", "evening"]),
    (
        MealType::Dessert,
        &["dessert", "sweet", "cake", "cookie", "pie", "pudding"],
    ),
    (MealType::Snack, &["snack", "appetizer", "starter"]),
    (
        MealType::Drink,
        &["drink", "beverage", "smoothie", "juice", "shake"],
    ),
];

/// Category keys with their trigger keywords; every match is kept
pub const CATEGORY_SYNONYMS: &[(&str, &[&str])] = &[
    ("vegetarian", &["vegetarian", "veggie", "meatless"]),
    ("vegan", &["vegan", "plant-based"]),
    ("gluten-free", &["gluten-free", "gluten free", "no gluten"]),
    ("dairy-free", &["dairy-free", "dairy free", "no dairy"]),
    ("low-carb", &["low-carb", "low carb", "keto"]),
    ("healthy", &["healthy", "light", "nutritious"]),
    ("quick", &["quick", "easy", "fast", "simple"]),
    ("spicy", &["spicy", "hot", "chili"]),
    ("creamy", &["creamy", "rich"]),
    ("grilled", &["grilled", "barbecue", "bbq"]),
    ("baked", &["baked", "oven", "roasted"]),
    ("fried", &["fried", "pan-fried", "deep-fried"]),
    ("pasta", &["pasta", "spaghetti", "noodles"]),
    ("salad", &["salad", "greens"]),
    ("soup", &["soup", "stew", "chowder"]),
    ("curry", &["curry", "masala"]),
    ("rice", &["rice", "risotto", "pilaf"]),
    ("seafood", &["fish", "seafood", "shrimp"]),
    ("chicken", &["chicken", "poultry"]),
    ("beef", &["beef", "steak"]),
    ("lamb", &["lamb", "mutton"]),
    ("mexican", &["mexican", "taco", "burrito"]),
    ("italian", &["italian", "pasta", "pizza"]),
    ("asian", &["asian", "chinese", "thai", "japanese"]),
    ("indian", &["indian", "tandoori", "curry"]),
    ("mediterranean", &["mediterranean", "greek"]),
];

/// Nutrient names with the words that refer to them. `carbs` has no column in
/// the nutrition record and resolves to no nutrient.
pub const NUTRIENT_SYNONYMS: &[(&str, &[&str])] = &[
    ("protein", &["protein", "high-protein"]),
    ("calories", &["calorie", "calories", "cal", "kcal"]),
    ("fat", &["fat", "low-fat"]),
    ("carbs", &["carb", "carbs", "carbohydrate"]),
    ("sodium", &["sodium", "salt", "low-sodium"]),
    ("sugar", &["sugar", "sugars"]),
];

/// Curated ingredient list, in resolution order
pub const INGREDIENTS: &[&str] = &[
    // Proteins
    "chicken", "chicken breast", "chicken thigh", "beef", "ground beef", "steak", "lamb",
    "turkey", "fish", "salmon", "tuna", "shrimp", "prawns", "crab", "lobster", "scallops",
    "cod", "tilapia", "tofu", "tempeh",
    // Vegetables
    "tomato", "tomatoes", "onion", "onions", "garlic", "potato", "potatoes", "carrot",
    "carrots", "celery", "cucumber", "zucchini", "squash", "bell pepper", "peppers",
    "jalapeño", "eggplant", "broccoli", "cauliflower", "spinach", "kale", "lettuce", "cabbage",
    "mushrooms", "corn", "peas", "green beans", "asparagus", "avocado", "beets",
    // Legumes
    "beans", "black beans", "kidney beans", "chickpeas", "lentils",
    // Grains
    "rice", "pasta", "noodles", "bread", "flour", "oats", "quinoa",
    // Dairy and eggs
    "cheese", "cheddar", "mozzarella", "parmesan", "feta", "cream cheese", "milk", "cream",
    "butter", "yogurt", "egg", "eggs",
    // Fruits
    "apple", "banana", "orange", "lemon", "lime", "strawberry", "blueberry", "mango",
    "pineapple", "peach", "grape", "coconut",
    // Nuts and seeds
    "almonds", "walnuts", "peanuts", "cashews", "pistachios", "pecans", "sunflower seeds",
    "sesame seeds", "chia seeds",
    // Herbs and spices
    "salt", "pepper", "basil", "oregano", "thyme", "rosemary", "parsley", "cilantro", "mint",
    "dill", "cinnamon", "cumin", "paprika", "turmeric", "ginger", "garlic powder",
    "onion powder", "chili powder", "curry powder",
    // Condiments and oils
    "olive oil", "vegetable oil", "coconut oil", "sesame oil", "soy sauce", "vinegar", "honey",
    "maple syrup", "mustard", "ketchup", "mayonnaise", "hot sauce", "sriracha",
    // Baking
    "sugar", "brown sugar", "vanilla", "chocolate", "cocoa", "baking powder", "baking soda",
    "yeast",
];

/// Curated dish names; the first one found in the query wins
pub const DISH_NAMES: &[&str] = &[
    "pizza", "pasta", "lasagna", "spaghetti", "risotto", "carbonara", "taco", "burrito",
    "enchilada", "quesadilla", "nachos", "fajita", "sushi", "ramen", "pad thai", "stir fry",
    "fried rice", "curry", "tikka masala", "biryani", "tandoori", "korma", "vindaloo", "burger",
    "sandwich", "wrap", "salad", "soup", "stew", "chili", "omelette", "frittata", "pancake",
    "waffle", "smoothie", "cake", "pie", "cookie", "brownie", "muffin", "cheesecake", "falafel",
    "hummus", "shawarma", "kebab", "gyro", "paella", "gumbo", "jambalaya", "casserole",
    "pot pie",
];

/// Generic query words that are never resolved to an ingredient
pub const GENERIC_STOP_WORDS: &[&str] = &[
    "meal", "recipe", "dish", "food", "calorie", "calories", "protein", "quick", "easy",
    "healthy", "high", "low", "breakfast", "lunch", "dinner", "vegetarian", "vegan", "want",
    "need", "find", "make",
];

/// Additional everyday food words known to the spelling corrector
pub const FOOD_WORDS: &[&str] = &[
    "duck", "pork", "ham", "bacon", "sausage", "meatball", "meatballs", "fillet", "thigh",
    "breast", "wings", "vegetable", "vegetables", "fruit", "fruits", "herb", "herbs", "spice",
    "spices", "sauce", "soup", "stew", "roast", "grill", "bake", "fry", "boil", "steam",
    "recipe", "recipes", "meal", "meals", "dish", "dishes", "food", "halal", "sweet", "savory",
    "sour", "bitter", "crispy", "crunchy", "tender", "juicy", "fresh", "frozen", "homemade",
    "traditional", "classic", "keto", "paleo", "gluten", "dairy", "lactose", "nut", "nuts",
    "seed", "seeds", "grain", "grains", "whole", "wheat",
];

/// Common query words that the spelling corrector must recognise as correct
pub const QUERY_WORDS: &[&str] = &[
    "a", "an", "and", "any", "are", "at", "but", "by", "can", "cal", "for", "from", "g",
    "gram", "grams", "have", "has", "in", "include", "including", "is", "it", "least",
    "less", "like", "made", "me", "more", "most", "much", "of", "on", "or", "out", "over",
    "please", "rich", "something", "than", "that", "the", "them", "to", "under", "use",
    "using", "want", "what", "with", "without", "no", "not", "avoid", "avoiding", "exclude",
    "excluding", "skip", "skipping", "hold", "minus", "leave", "except", "free", "none",
    "never", "don't", "dont", "doesn't", "doesnt", "does", "do", "contain", "containing",
    "add", "need", "find", "make", "show", "give", "some", "high", "low", "light", "quick",
    "easy", "fast", "simple", "healthy", "kids", "family", "party", "week", "today",
    "tonight", "dinner", "lunch", "breakfast", "snack", "dessert", "drink", "brunch",
    "morning", "evening", "supper", "midday", "noon", "calorie", "calories", "protein",
    "fat", "sodium", "sugar", "carb", "carbs", "carbohydrate", "kcal", "mg",
];

/// Whether a phrase is a generic or dish word that must not resolve to ingredients
#[must_use]
pub fn is_stop_word(phrase: &str) -> bool {
    GENERIC_STOP_WORDS.contains(&phrase) || DISH_NAMES.contains(&phrase)
}

/// Whether a curated ingredient is also a dish name
#[must_use]
pub fn is_dish_name(word: &str) -> bool {
    DISH_NAMES.contains(&word)
}

/// Nutrient referred to by a word, if the nutrition record tracks it
#[must_use]
pub fn nutrient_for_word(word: &str) -> Option<Nutrient> {
    NUTRIENT_SYNONYMS
        .iter()
        .find(|(_, words)| words.contains(&word))
        .and_then(|(name, _)| Nutrient::parse(name))
        .or_else(|| word.contains("cal").then_some(Nutrient::Calories))
}

/// Curated ingredients matching a negated phrase by containment in either direction
#[must_use]
pub fn resolve_ingredients(phrase: &str) -> Vec<&'static str> {
    INGREDIENTS
        .iter()
        .copied()
        .filter(|ingredient| phrase.contains(ingredient) || ingredient.contains(phrase))
        .filter(|ingredient| !is_stop_word(ingredient))
        .collect()
}

/// Every word the vocabulary knows, for seeding a spelling dictionary
pub fn known_words() -> impl Iterator<Item = &'static str> {
    let synonym_words = MEAL_TYPE_SYNONYMS
        .iter()
        .flat_map(|(_, words)| words.iter().copied())
        .chain(CATEGORY_SYNONYMS.iter().flat_map(|(_, words)| words.iter().copied()))
        .chain(NUTRIENT_SYNONYMS.iter().flat_map(|(_, words)| words.iter().copied()));

    INGREDIENTS
        .iter()
        .chain(DISH_NAMES)
        .chain(NEGATION_MARKERS)
        .chain(GENERIC_STOP_WORDS)
        .chain(FOOD_WORDS)
        .chain(QUERY_WORDS)
        .copied()
        .chain(synonym_words)
        .flat_map(str::split_whitespace)
}
