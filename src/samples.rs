use crate::model::{Difficulty, Recipe};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Recipes offered on first run, one or more per difficulty
pub fn sample_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            id: "easy-1".to_string(),
            title: "Classic Tomato Soup".to_string(),
            description: "A warm, comforting tomato soup perfect for any season.".to_string(),
            ingredients: strings(&[
                "4 large tomatoes",
                "1 onion",
                "2 cloves garlic",
                "2 cups vegetable broth",
                "Salt",
                "Pepper",
            ]),
            steps: strings(&[
                "Chop tomatoes, onion, and garlic.",
                "Sauté onion and garlic in pot.",
                "Add tomatoes and broth.",
                "Simmer 20 minutes.",
                "Blend until smooth.",
                "Season to taste.",
            ]),
            prep_time: 10,
            cook_time: 30,
            difficulty: Difficulty::Easy,
            image_url: None,
        },
        Recipe {
            id: "easy-2".to_string(),
            title: "Scrambled Eggs".to_string(),
            description: "Fluffy scrambled eggs with a creamy texture.".to_string(),
            ingredients: strings(&["4 eggs", "2 tbsp milk", "Salt", "Pepper", "Butter"]),
            steps: strings(&[
                "Crack eggs into bowl.",
                "Add milk, salt, and pepper.",
                "Whisk until combined.",
                "Melt butter in pan.",
                "Cook eggs over low heat, stirring gently until set.",
            ]),
            prep_time: 5,
            cook_time: 5,
            difficulty: Difficulty::Easy,
            image_url: None,
        },
        Recipe {
            id: "medium-1".to_string(),
            title: "Chicken Alfredo Pasta".to_string(),
            description: "Creamy Alfredo sauce with grilled chicken and fettuccine pasta."
                .to_string(),
            ingredients: strings(&[
                "200g fettuccine",
                "150g chicken breast",
                "1 cup heavy cream",
                "1/2 cup Parmesan",
                "2 cloves garlic",
                "Salt",
                "Pepper",
            ]),
            steps: strings(&[
                "Cook pasta following package instructions.",
                "Grill chicken and slice.",
                "Prepare Alfredo sauce with cream, cheese, and garlic.",
                "Combine pasta, chicken, and sauce.",
                "Serve warm.",
            ]),
            prep_time: 20,
            cook_time: 25,
            difficulty: Difficulty::Medium,
            image_url: None,
        },
        Recipe {
            id: "hard-1".to_string(),
            title: "Beef Wellington".to_string(),
            description: "Classic Beef Wellington with mushroom duxelles and puff pastry."
                .to_string(),
            ingredients: strings(&[
                "1 beef tenderloin",
                "250g mushrooms",
                "1 sheet puff pastry",
                "2 tbsp Dijon mustard",
                "1 egg",
                "Salt",
                "Pepper",
            ]),
            steps: strings(&[
                "Sear beef tenderloin.",
                "Prepare mushroom duxelles.",
                "Wrap beef and duxelles in puff pastry.",
                "Brush with egg wash.",
                "Bake at 200°C for 40 minutes.",
                "Rest 10 minutes before serving.",
            ]),
            prep_time: 60,
            cook_time: 45,
            difficulty: Difficulty::Hard,
            image_url: None,
        },
    ]
}
