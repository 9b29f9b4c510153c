/// Sample template printed by `datagen --create-sample`.
pub const SAMPLE_TEMPLATE: &str = include_str!("../../../templates/sample.json");
