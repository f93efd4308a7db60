use crate::parser::{BoolOp, Rsl};

/// Split a document into its independent request units.
///
/// A `+` group contributes each of its children, flattening nested `+`
/// groups; any other node is a single unit.
pub fn split_rsl(rsl: &Rsl) -> Vec<&Rsl> {
    let mut units = Vec::new();
    collect_units(rsl, &mut units);
    units
}

fn collect_units<'a>(rsl: &'a Rsl, units: &mut Vec<&'a Rsl>) {
    match rsl {
        Rsl::Boolean(boolean) if boolean.op == BoolOp::Multi => {
            for child in &boolean.children {
                collect_units(child, units);
            }
        }
        Rsl::Boolean(_) | Rsl::Condition(_) => units.push(rsl),
    }
}
