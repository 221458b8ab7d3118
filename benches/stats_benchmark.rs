use chrono::{Duration, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use fitness_tracker::models::{FoodItem, Meal, MealType, NutritionLog, NutritionStats};
use fitness_tracker::time_utils::parse_client_date;
use std::hint::black_box;

const MEAL_TYPES: [MealType; 5] = [
    MealType::Breakfast,
    MealType::Lunch,
    MealType::Dinner,
    MealType::Snack,
    MealType::Other,
];

/// A year of daily logs with a few meals each.
fn build_logs(days: i64) -> Vec<NutritionLog> {
    let start = parse_client_date("2023-01-01").expect("valid date");
    let now = Utc::now();

    (0..days)
        .map(|d| {
            let mut log = NutritionLog::new("bench-user", start + Duration::days(d), now);
            log.water_intake = 1.5 + (d % 4) as f64 * 0.25;
            for m in 0..(2 + d % 3) {
                let foods = (0..3)
                    .map(|f| FoodItem {
                        name: format!("food-{}", f),
                        calories: 150.0 + ((d + m + f) % 7) as f64 * 40.0,
                        protein: 10.0,
                        carbs: 25.0,
                        fat: 6.0,
                        serving_size: None,
                    })
                    .collect();
                let meal_type = MEAL_TYPES[((d + m) % 5) as usize];
                log.meals.push(Meal::new(meal_type, None, foods, None, now));
            }
            log.recompute_totals();
            log
        })
        .collect()
}

fn benchmark_stats(c: &mut Criterion) {
    let week = build_logs(7);
    let year = build_logs(365);

    let mut group = c.benchmark_group("nutrition_stats");

    group.bench_function("one_week", |b| {
        b.iter(|| NutritionStats::from_logs(black_box(&week)))
    });

    group.bench_function("one_year", |b| {
        b.iter(|| NutritionStats::from_logs(black_box(&year)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_stats);
criterion_main!(benches);
