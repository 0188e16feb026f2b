//! A form of integer counters with a save button, followed by a long static
//! list.

use arbor::{
    tr,
    widgets::{WidgetBuilder, button, container, integer, list, text},
};

/// Number of counters in the default model.
pub const COUNTERS: usize = 10;

/// Number of rows in the static list.
pub const ROWS: usize = 5;

/// The sample model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counters {
    /// Counter values.
    pub values: Vec<i64>,
    /// How many times the form was saved.
    pub saves: u32,
}

impl Counters {
    /// A model with `n` counters, each initialised to its index.
    pub fn new(n: usize) -> Self {
        Self {
            values: (0..n as i64).collect(),
            saves: 0,
        }
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new(COUNTERS)
    }
}

/// Route of the counter input at `i`.
pub fn counter_route(i: usize) -> String {
    format!("/inputs/div{i}/name{i}")
}

/// Route of the save button.
pub const SAVE: &str = "/inputs/test";

/// Build the form.
pub fn view(model: &Counters) -> WidgetBuilder<Counters> {
    let mut inputs: Vec<_> = model
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            container(vec![
                integer(*v, move |m: &mut Counters, n| {
                    if let Some(slot) = m.values.get_mut(i) {
                        *slot = n;
                    }
                })
                .label(tr!("Counter {}", i))
                .id(format!("name{i}")),
            ])
            .id(format!("div{i}"))
        })
        .collect();
    inputs.push(button(save).label(tr!("Salva")).id("test"));

    let rows = (0..ROWS)
        .map(|i| container(vec![text(tr!("Test {}", i))]).id(format!("row{i}")))
        .collect();

    container(vec![container(inputs).id("inputs"), list(rows).id("list")])
}

/// Save the form.
fn save(model: &mut Counters) {
    model.saves += 1;
    tracing::info!(values = ?model.values, saves = model.saves, "saved");
}
