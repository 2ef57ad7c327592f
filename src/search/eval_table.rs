//! Optional trace of scores seen during a search.

use serde::Serialize;

use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvalRecord {
    pub depth: u8,
    pub maximizing: bool,
    #[serde(serialize_with = "serialize_move")]
    pub mv: Option<Move>,
    pub score: i32,
}

fn serialize_move<S: serde::Serializer>(mv: &Option<Move>, serializer: S) -> Result<S::Ok, S::Error> {
    match mv {
        Some(mv) => serializer.collect_str(mv),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvalTable {
    records: Vec<EvalRecord>,
}

impl EvalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, depth: u8, maximizing: bool, mv: Option<Move>, score: i32) {
        self.records.push(EvalRecord {
            depth,
            maximizing,
            mv,
            score,
        });
    }

    pub fn records(&self) -> &[EvalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Text table grouped by remaining depth, shallowest first; insertion
    /// order is kept within a depth.
    pub fn render(&self) -> String {
        let mut sorted = self.records.clone();
        sorted.sort_by_key(|record| record.depth);

        let mut out = String::new();
        out.push_str("Evaluation Table:\n");
        out.push_str("------------------\n");
        out.push_str("| Depth | Maximizer | Move   | Evaluation |\n");
        out.push_str("------------------\n");
        for record in &sorted {
            let side = if record.maximizing { "Max" } else { "Min" };
            let mv = record.mv.map(|mv| mv.to_string()).unwrap_or_default();
            let row = format!("|   {}   |    {side}     | {mv:<6} | {}", record.depth, record.score);
            out.push_str(&format!("{row:<35} |\n"));
        }
        out.push_str("------------------\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::EvalTable;
    use crate::game_state::game_state::GameState;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    #[test]
    fn render_sorts_by_depth_and_keeps_insertion_order() {
        let board = GameState::new_game();
        let e4 = long_algebraic_to_move("e2e4", &board).expect("LAN should parse");
        let d4 = long_algebraic_to_move("d2d4", &board).expect("LAN should parse");

        let mut table = EvalTable::new();
        table.push(1, true, Some(e4), 40);
        table.push(0, false, None, 40);
        table.push(1, true, Some(d4), 35);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Evaluation Table:");
        assert_eq!(lines[2], "| Depth | Maximizer | Move   | Evaluation |");
        assert_eq!(lines[4], "|   0   |    Min     |        | 40  |");
        assert_eq!(lines[5], "|   1   |    Max     | e2e4   | 40  |");
        assert_eq!(lines[6], "|   1   |    Max     | d2d4   | 35  |");
        assert_eq!(lines[7], "------------------");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn records_serialize_moves_as_text() {
        let board = GameState::new_game();
        let e4 = long_algebraic_to_move("e2e4", &board).expect("LAN should parse");
        let mut table = EvalTable::new();
        table.push(1, true, Some(e4), 40);
        table.push(0, false, None, -3);

        let json = serde_json::to_value(&table).expect("table should serialize");
        assert_eq!(json["records"][0]["mv"], "e2e4");
        assert!(json["records"][1]["mv"].is_null());
        assert_eq!(json["records"][1]["score"], -3);
    }
}
