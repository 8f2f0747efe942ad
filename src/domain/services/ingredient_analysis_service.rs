// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;

use crate::domain::models::nutrition::NutrientProfile;
use crate::domain::models::recipe::RecipeCategory;

const CATEGORY_TABLE: &[(&str, &str)] = &[
    ("chicken", "proteins"),
    ("beef", "proteins"),
    ("pork", "proteins"),
    ("fish", "proteins"),
    ("salmon", "proteins"),
    ("tuna", "proteins"),
    ("egg", "proteins"),
    ("tofu", "proteins"),
    ("beans", "proteins"),
    ("onion", "vegetables"),
    ("garlic", "vegetables"),
    ("tomato", "vegetables"),
    ("carrot", "vegetables"),
    ("potato", "vegetables"),
    ("broccoli", "vegetables"),
    ("spinach", "vegetables"),
    ("lettuce", "vegetables"),
    ("cucumber", "vegetables"),
    ("bell pepper", "vegetables"),
    ("mushroom", "vegetables"),
    ("apple", "fruits"),
    ("banana", "fruits"),
    ("orange", "fruits"),
    ("strawberry", "fruits"),
    ("blueberry", "fruits"),
    ("lemon", "fruits"),
    ("avocado", "fruits"),
    ("mango", "fruits"),
    ("rice", "grains"),
    ("bread", "grains"),
    ("pasta", "grains"),
    ("quinoa", "grains"),
    ("oats", "grains"),
    ("milk", "dairy"),
    ("cheese", "dairy"),
    ("butter", "dairy"),
    ("yogurt", "dairy"),
    ("cream", "dairy"),
    ("basil", "herbs_spices"),
    ("cilantro", "herbs_spices"),
    ("parsley", "herbs_spices"),
];

/// 适合做奶昔或甜点的水果
const SWEET_FRUITS: &[&str] = &[
    "apple", "banana", "orange", "grape", "strawberry", "blueberry", "raspberry", "berry",
    "berries", "lemon", "lime", "pineapple", "mango", "avocado", "peach", "pear", "cherry",
    "watermelon", "melon", "cantaloupe", "kiwi", "papaya", "coconut", "plum", "pomegranate",
];

/// 可以和水果一起打成奶昔的绿叶菜
const SMOOTHIE_GREENS: &[&str] = &["spinach", "kale"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngredientCategories {
    pub proteins: Vec<String>,
    pub vegetables: Vec<String>,
    pub fruits: Vec<String>,
    pub grains: Vec<String>,
    pub dairy: Vec<String>,
    pub herbs_spices: Vec<String>,
}

impl IngredientCategories {
    fn bucket(&mut self, category: &str) -> &mut Vec<String> {
        match category {
            "proteins" => &mut self.proteins,
            "fruits" => &mut self.fruits,
            "grains" => &mut self.grains,
            "dairy" => &mut self.dairy,
            "herbs_spices" => &mut self.herbs_spices,
            _ => &mut self.vegetables,
        }
    }

    /// 数量最多的类别，并列时取靠前的
    fn primary(&self) -> &'static str {
        let counts = [
            ("proteins", self.proteins.len()),
            ("vegetables", self.vegetables.len()),
            ("fruits", self.fruits.len()),
            ("grains", self.grains.len()),
            ("dairy", self.dairy.len()),
            ("herbs_spices", self.herbs_spices.len()),
        ];
        let mut best = counts[0];
        for candidate in counts.iter().skip(1) {
            if candidate.1 > best.1 {
                best = *candidate;
            }
        }
        best.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookingMethodSuggestion {
    pub method: &'static str,
    pub reason: &'static str,
    pub time: &'static str,
}

/// 食材分析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientAnalysis {
    pub ingredient_categories: IngredientCategories,
    pub recommended_cooking_methods: Vec<CookingMethodSuggestion>,
    pub flavor_profiles: Vec<&'static str>,
    pub cuisine_suggestions: Vec<&'static str>,
    pub nutritional_highlights: Vec<&'static str>,
    pub total_ingredients: usize,
    pub primary_category: &'static str,
    pub suggested_categories: Vec<RecipeCategory>,
}

fn category_of(name: &str) -> &'static str {
    CATEGORY_TABLE
        .iter()
        .find(|(ingredient, _)| *ingredient == name)
        .map(|(_, category)| *category)
        .unwrap_or("vegetables")
}

fn is_sweet_fruit(name: &str) -> bool {
    SWEET_FRUITS.iter().any(|fruit| name.contains(fruit))
}

/// 根据食材推荐菜谱类别
///
/// 全部是水果，或只有水果和奶昔绿叶菜且至少有一个水果时推荐奶昔与甜点
pub fn suggest_categories(names: &[String]) -> Vec<RecipeCategory> {
    let lowered: Vec<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
    let has_fruit = lowered.iter().any(|n| is_sweet_fruit(n));
    let blendable = lowered
        .iter()
        .all(|n| is_sweet_fruit(n) || SMOOTHIE_GREENS.iter().any(|g| n.contains(g)));

    if !lowered.is_empty() && has_fruit && blendable {
        vec![RecipeCategory::Smoothie, RecipeCategory::Dessert]
    } else {
        vec![RecipeCategory::Cuisine]
    }
}

/// 分析一组食材
///
/// # 参数
///
/// * `names` - 食材名称
/// * `per_serving` - 每份营养（可选），用于生成营养亮点
pub fn analyze_ingredients(names: &[String], per_serving: Option<&NutrientProfile>) -> IngredientAnalysis {
    let lowered: Vec<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();

    let mut categories = IngredientCategories::default();
    for (original, name) in names.iter().zip(&lowered) {
        categories.bucket(category_of(name)).push(original.clone());
    }

    let mut methods = Vec::new();
    let has_raw_vegetable = categories
        .vegetables
        .iter()
        .any(|v| ["lettuce", "cucumber", "tomato"].contains(&v.to_lowercase().as_str()));
    if !categories.fruits.is_empty() || has_raw_vegetable {
        methods.push(CookingMethodSuggestion {
            method: "fresh",
            reason: "Fresh fruits and vegetables are excellent raw",
            time: "5-10 minutes",
        });
    }
    if !categories.vegetables.is_empty() || !categories.proteins.is_empty() {
        methods.push(CookingMethodSuggestion {
            method: "sautéed",
            reason: "Vegetables and proteins cook well with quick sautéing",
            time: "10-15 minutes",
        });
    }
    if !categories.fruits.is_empty() {
        methods.push(CookingMethodSuggestion {
            method: "blended",
            reason: "Fruits blend beautifully for smoothies and drinks",
            time: "5 minutes",
        });
    }
    if names.len() > 1 {
        methods.push(CookingMethodSuggestion {
            method: "baked",
            reason: "Multiple ingredients can be roasted together",
            time: "25-35 minutes",
        });
    }

    let mut flavors = Vec::new();
    if !categories.fruits.is_empty() {
        flavors.extend(["sweet", "fresh", "light"]);
    }
    if !categories.herbs_spices.is_empty() {
        flavors.extend(["aromatic", "flavorful"]);
    }
    if !categories.proteins.is_empty() {
        flavors.extend(["savory", "hearty"]);
    }

    let has_any = |set: &[&str]| lowered.iter().any(|n| set.contains(&n.as_str()));
    let mut cuisines = Vec::new();
    if has_any(&["tomato", "basil", "garlic"]) {
        cuisines.push("Italian");
    }
    if has_any(&["cilantro", "lime", "avocado"]) {
        cuisines.push("Mexican");
    }
    if has_any(&["ginger", "soy", "rice"]) {
        cuisines.push("Asian");
    }

    let mut highlights = Vec::new();
    if let Some(per_serving) = per_serving {
        if per_serving.protein_g > 15.0 {
            highlights.push("High protein content");
        }
        if per_serving.fiber_g > 5.0 {
            highlights.push("High fiber content");
        }
        if per_serving.vit_c_mg > 20.0 {
            highlights.push("Rich in Vitamin C");
        }
        if per_serving.kcal < 200.0 {
            highlights.push("Low calorie option");
        }
    }

    let primary_category = if names.is_empty() {
        "mixed"
    } else {
        categories.primary()
    };

    IngredientAnalysis {
        total_ingredients: names.len(),
        primary_category,
        suggested_categories: suggest_categories(names),
        ingredient_categories: categories,
        recommended_cooking_methods: methods,
        flavor_profiles: flavors,
        cuisine_suggestions: cuisines,
        nutritional_highlights: highlights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fruit_only_suggests_smoothie_and_dessert() {
        assert_eq!(
            suggest_categories(&names(&["Banana", "strawberries", "mango"])),
            vec![RecipeCategory::Smoothie, RecipeCategory::Dessert]
        );
        assert_eq!(
            suggest_categories(&names(&["banana", "spinach"])),
            vec![RecipeCategory::Smoothie, RecipeCategory::Dessert]
        );
    }

    #[test]
    fn test_mixed_or_green_only_suggests_cuisine() {
        assert_eq!(
            suggest_categories(&names(&["apple", "chicken"])),
            vec![RecipeCategory::Cuisine]
        );
        assert_eq!(suggest_categories(&names(&["spinach", "kale"])), vec![RecipeCategory::Cuisine]);
        assert_eq!(suggest_categories(&[]), vec![RecipeCategory::Cuisine]);
    }

    #[test]
    fn test_categorization_defaults_to_vegetables() {
        let analysis = analyze_ingredients(&names(&["Chicken", "paneer", "basil", "tomato"]), None);
        assert_eq!(analysis.ingredient_categories.proteins, vec!["Chicken"]);
        assert_eq!(analysis.ingredient_categories.vegetables, vec!["paneer", "tomato"]);
        assert_eq!(analysis.ingredient_categories.herbs_spices, vec!["basil"]);
        assert_eq!(analysis.primary_category, "vegetables");
        assert_eq!(analysis.total_ingredients, 4);
        assert_eq!(analysis.cuisine_suggestions, vec!["Italian"]);
        assert_eq!(
            analysis.flavor_profiles,
            vec!["aromatic", "flavorful", "savory", "hearty"]
        );
    }

    #[test]
    fn test_cooking_methods() {
        let single_fruit = analyze_ingredients(&names(&["mango"]), None);
        let methods: Vec<_> = single_fruit
            .recommended_cooking_methods
            .iter()
            .map(|m| m.method)
            .collect();
        assert_eq!(methods, vec!["fresh", "blended"]);

        let mixed = analyze_ingredients(&names(&["onion", "beef"]), None);
        let methods: Vec<_> = mixed.recommended_cooking_methods.iter().map(|m| m.method).collect();
        assert_eq!(methods, vec!["sautéed", "baked"]);
    }

    #[test]
    fn test_nutritional_highlights() {
        let per_serving = NutrientProfile {
            kcal: 150.0,
            protein_g: 20.0,
            fiber_g: 6.0,
            vit_c_mg: 10.0,
            ..Default::default()
        };
        let analysis = analyze_ingredients(&names(&["tofu"]), Some(&per_serving));
        assert_eq!(
            analysis.nutritional_highlights,
            vec!["High protein content", "High fiber content", "Low calorie option"]
        );
    }

    #[test]
    fn test_empty_input_is_mixed() {
        let analysis = analyze_ingredients(&[], None);
        assert_eq!(analysis.primary_category, "mixed");
        assert!(analysis.recommended_cooking_methods.is_empty());
    }
}
