use super::model::Category;

const FRUITS_VEGETABLES: &[&str] = &[
    "apple", "banana", "orange", "lemon", "lime", "grape", "strawberr", "blueberr",
    "raspberr", "blackberr", "cranberr", "cherr", "peach", "pear", "plum", "mango",
    "pineapple", "watermelon", "melon", "kiwi", "avocado", "tomato", "potato", "carrot",
    "onion", "garlic", "lettuce", "spinach", "kale", "cabbage", "broccoli", "cauliflower",
    "celery", "cucumber", "zucchini", "courgette", "eggplant", "aubergine", "bell pepper",
    "jalapeno", "mushroom", "asparagus", "green bean", "snap pea", "green peas", "beet",
    "radish", "turnip", "parsnip", "squash", "pumpkin", "leek", "shallot", "scallion",
    "spring onion", "arugula", "rocket", "artichoke", "brussels sprout", "okra", "fennel",
    "bok choy", "chard", "collard", "yam", "coconut", "pomegranate", "papaya", "apricot",
    "nectarine", "grapefruit", "tangerine", "clementine", "mandarin", "raisin", "prune",
    "olives", "sweet corn", "corn on the cob", "edamame", "jicama", "rhubarb",
    "passion fruit", "guava", "lychee", "persimmon", "plantain", "bean sprout",
    "watercress", "endive", "radicchio", "salad", "greens", "fruit", "vegetable", "berries",
];

const PROTEINS: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "duck", "veal", "venison", "bison",
    "bacon", "sausage", "salami", "pepperoni", "prosciutto", "chorizo", "pancetta",
    "steak", "mince", "ground meat", "meatball", "brisket", "ribs", "tenderloin", "fillet",
    "fish", "salmon", "tuna", "cod", "shrimp", "prawn", "crab", "lobster", "scallop",
    "mussel", "clam", "oyster", "squid", "calamari", "octopus", "sardine", "anchov",
    "tilapia", "trout", "halibut", "mackerel", "haddock", "sea bass", "egg", "tofu",
    "tempeh", "seitan", "peanut butter", "almond", "walnut", "cashew", "pecan",
    "pistachio", "hazelnut", "macadamia", "protein",
];

const DAIRY: &[&str] = &[
    "milk", "cheese", "cheddar", "mozzarella", "parmesan", "parmigiano", "feta", "brie",
    "camembert", "gouda", "ricotta", "mascarpone", "halloumi", "gruyere", "provolone",
    "cream", "butter", "yogurt", "yoghurt", "kefir", "ghee", "custard", "creme fraiche",
    "buttermilk", "half and half", "ice cream", "whey", "curd",
];

const GRAINS_LEGUMES: &[&str] = &[
    "rice", "pasta", "spaghetti", "penne", "fusilli", "macaroni", "lasagna", "noodle",
    "bread", "baguette", "tortilla", "pita", "bagel", "croissant", "cracker", "cereal",
    "oat", "granola", "quinoa", "couscous", "bulgur", "barley", "farro", "millet",
    "buckwheat", "polenta", "cornmeal", "semolina", "rye", "wheat", "bran", "lentil",
    "chickpea", "garbanzo", "black bean", "kidney bean", "pinto bean", "navy bean",
    "cannellini", "soybean", "split pea", "beans", "grain", "legume",
];

const SPICES_HERBS: &[&str] = &[
    "salt", "pepper", "paprika", "cumin", "turmeric", "cinnamon", "nutmeg", "clove",
    "cardamom", "coriander", "cilantro", "parsley", "basil", "oregano", "thyme",
    "rosemary", "sage", "dill", "mint", "tarragon", "chive", "bay lea", "ginger",
    "chili powder", "chilli", "cayenne", "curry", "garam masala", "allspice", "anise",
    "fenugreek", "saffron", "sumac", "za'atar", "mustard seed", "fennel seed",
    "sesame seed", "poppy seed", "herb", "spice", "seasoning", "lemongrass",
];

const SAUCES_CONDIMENTS: &[&str] = &[
    "sauce", "ketchup", "mustard", "mayo", "vinegar", "oil", "soy", "salsa", "honey",
    "syrup", "jam", "jelly", "marmalade", "dressing", "pesto", "sriracha", "tahini",
    "hummus", "relish", "chutney", "miso", "gochujang", "harissa", "tabasco", "aioli",
    "guacamole", "broth", "stock", "bouillon", "paste", "gravy", "marinade",
];

const BAKING_ESSENTIALS: &[&str] = &[
    "flour", "sugar", "baking powder", "baking soda", "bicarbonate", "yeast", "vanilla",
    "cocoa", "chocolate", "cornstarch", "corn starch", "gelatin", "sprinkles",
    "shortening", "molasses", "extract", "icing", "frosting", "cream of tartar",
    "food coloring", "marzipan", "fondant", "agar",
];

/// Keyword table checked in priority order; the first matching keyword wins.
pub static CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::FruitsVegetables, FRUITS_VEGETABLES),
    (Category::Proteins, PROTEINS),
    (Category::Dairy, DAIRY),
    (Category::GrainsLegumes, GRAINS_LEGUMES),
    (Category::SpicesHerbs, SPICES_HERBS),
    (Category::SaucesCondiments, SAUCES_CONDIMENTS),
    (Category::BakingEssentials, BAKING_ESSENTIALS),
];

/// Maps a free-text item name to its shelf category.
///
/// Total over all inputs: anything without a keyword hit is `Others`.
pub fn categorize(name: &str) -> Category {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return Category::Others;
    }

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Others)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn should_categorize_chicken_breast_as_protein() {
        assert_eq!(categorize("chicken breast"), Category::Proteins);
    }

    #[test]
    fn should_fall_back_to_others_when_nothing_matches() {
        assert_eq!(categorize("xyzzy"), Category::Others);
        assert_eq!(categorize(""), Category::Others);
        assert_eq!(categorize("   "), Category::Others);
    }

    #[test]
    fn should_ignore_case_and_surrounding_whitespace() {
        assert_eq!(categorize("  Whole MILK "), Category::Dairy);
        assert_eq!(categorize("GARLIC"), Category::FruitsVegetables);
    }

    #[test]
    fn should_cover_each_category() {
        assert_eq!(categorize("Roma tomatoes"), Category::FruitsVegetables);
        assert_eq!(categorize("Cheddar cheese"), Category::Dairy);
        assert_eq!(categorize("Basmati rice"), Category::GrainsLegumes);
        assert_eq!(categorize("Smoked paprika"), Category::SpicesHerbs);
        assert_eq!(categorize("Soy sauce"), Category::SaucesCondiments);
        assert_eq!(categorize("All-purpose flour"), Category::BakingEssentials);
    }

    #[test]
    fn should_prefer_earlier_category_when_several_match() {
        // "eggplant" is listed under vegetables, which are checked before proteins ("egg").
        assert_eq!(categorize("eggplant"), Category::FruitsVegetables);
        // "peanut butter" is a protein keyword, checked before dairy ("butter").
        assert_eq!(categorize("creamy peanut butter"), Category::Proteins);
    }

    #[test]
    fn should_keep_keyword_table_in_priority_order() {
        let order: Vec<Category> = CATEGORY_KEYWORDS.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, Category::ALL[..7].to_vec());
        assert!(CATEGORY_KEYWORDS.iter().map(|(_, k)| k.len()).sum::<usize>() > 200);
    }

    proptest! {
        #[test]
        fn categorize_is_deterministic(name in ".{0,40}") {
            prop_assert_eq!(categorize(&name), categorize(&name));
        }

        #[test]
        fn categorize_ignores_padding(name in "[a-z ]{0,30}") {
            prop_assert_eq!(categorize(&name), categorize(&format!("  {}\t", name)));
        }
    }
}
