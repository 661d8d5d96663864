//! (state, symbol) keyed cells, written as a list of `{state, symbol, value}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{lr::StateId, Symbol};

#[derive(Serialize)]
struct CellRef<'a, V> {
    state: StateId,
    symbol: &'a Symbol,
    value: &'a V,
}

#[derive(Deserialize)]
struct Cell<V> {
    state: StateId,
    symbol: Symbol,
    value: V,
}

pub fn serialize<S, V>(
    cells: &BTreeMap<(StateId, Symbol), V>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(cells.iter().map(|((state, symbol), value)| CellRef {
        state: *state,
        symbol,
        value,
    }))
}

pub fn deserialize<'de, D, V>(deserializer: D) -> Result<BTreeMap<(StateId, Symbol), V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Ok(Vec::<Cell<V>>::deserialize(deserializer)?
        .into_iter()
        .map(|cell| ((cell.state, cell.symbol), cell.value))
        .collect())
}
