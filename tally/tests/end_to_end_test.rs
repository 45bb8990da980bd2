use std::str::FromStr;
use tally::{compile, format_decimal, Bindings, Decimal, Engine, Type};

fn dec(text: &str) -> Decimal {
    Decimal::from_str(text).unwrap()
}

#[test]
fn test_tile_yield_formula() {
    let expression =
        compile("(base + bonus * level) * (terrain == 2 ? 1.5 : 1) - upkeep").unwrap();
    assert_eq!(expression.variables(), vec!["base", "bonus", "level", "terrain", "upkeep"]);

    let forest = Bindings::new()
        .with("base", 4)
        .with("bonus", dec("0.5"))
        .with("level", 3)
        .with("terrain", 2)
        .with("upkeep", 1);
    assert_eq!(expression.evaluate(&forest).unwrap(), dec("7.25"));

    let plains = forest.clone().with("terrain", 1);
    assert_eq!(expression.evaluate(&plains).unwrap(), dec("4.5"));
}

#[test]
fn test_powerup_spawn_rule() {
    let rule = compile("score >= threshold && lives < 3 || boss_defeated == 1").unwrap();
    assert_eq!(rule.result_type(), Type::Boolean);

    let bindings = Bindings::new()
        .with("score", 1200)
        .with("threshold", 1000)
        .with("lives", 2)
        .with("boss_defeated", 0);
    assert!(rule.evaluate_bool(&bindings).unwrap());

    let bindings = bindings.with("lives", 5);
    assert!(!rule.evaluate_bool(&bindings).unwrap());

    let bindings = bindings.with("boss_defeated", 1);
    assert!(rule.evaluate_bool(&bindings).unwrap());
}

#[test]
fn test_color_interpolation() {
    let channel = compile("int (from + (to - from) * t / duration)").unwrap();
    let bindings = Bindings::new()
        .with("from", 32)
        .with("to", 255)
        .with("t", 1)
        .with("duration", 3);
    // 32 + 223 / 3 = 106.333... truncated
    assert_eq!(channel.evaluate(&bindings).unwrap(), Decimal::from(106));
}

#[test]
fn test_clamp_with_nested_conditionals() {
    let clamp = compile("x < lo ? lo : x > hi ? hi : x").unwrap();
    let bounds = Bindings::new().with("lo", 0).with("hi", 100);

    for (x, expected) in [(-5, 0), (50, 50), (150, 100)] {
        let bindings = bounds.clone().with("x", x);
        assert_eq!(clamp.evaluate(&bindings).unwrap(), Decimal::from(expected));
    }
}

#[test]
fn test_resource_regeneration() {
    let regen = compile("abs (max - current) pow 2 / max % 7").unwrap();
    let bindings = Bindings::new().with("max", 10).with("current", 4);
    // 36 / 10 = 3.6, 3.6 % 7 = 3.6
    assert_eq!(format_decimal(&regen.evaluate(&bindings).unwrap()), "3.6");
}

#[test]
fn test_engine_formula_file() {
    let mut engine = Engine::new();
    engine
        .add_formulas(
            r#"
# economy.tally
income    = workers * rate + (market_bonus > 0 ? market_bonus : 0)
tax       = income * 0.15
net       = income - income * 0.15
can_build = net >= cost
"#,
            "economy.tally",
        )
        .unwrap();

    let bindings = Bindings::new()
        .with("workers", 12)
        .with("rate", dec("2.5"))
        .with("market_bonus", 5)
        .with("cost", 25);

    let results = engine.evaluate_all(&bindings);
    let values: Vec<String> = results
        .iter()
        .map(|r| format_decimal(r.value.as_ref().unwrap()))
        .collect();
    assert_eq!(values, vec!["35", "5.25", "29.75", "1"]);
    assert_eq!(results[3].as_bool(), Some(true));
}

#[test]
fn test_reuse_across_many_bindings() {
    let expression = compile("n * (n + 1) / 2").unwrap();
    for n in 0..50i64 {
        let value = expression.evaluate(&Bindings::new().with("n", n)).unwrap();
        assert_eq!(value, Decimal::from(n * (n + 1) / 2));
    }
}

#[test]
fn test_compiled_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<tally::Expression>();
    assert_send_sync::<tally::Engine>();
    assert_send_sync::<tally::TallyError>();
    assert_send_sync::<Bindings>();
}
