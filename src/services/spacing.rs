use crate::model::fluent::Span;

/// Quebras de linha que separavam duas entradas vizinhas no documento original.
///
/// Sem um dos spans (entrada sintética), ou com spans fora de ordem, usa uma única quebra.
pub fn gap(prev: Option<Span>, next: Option<Span>) -> String {
    match (prev, next) {
        (Some(prev), Some(next)) => match next.start.checked_sub(prev.end) {
            Some(count) => "\n".repeat(count),
            None => "\n".to_string(),
        },
        _ => "\n".to_string(),
    }
}
