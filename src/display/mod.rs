use std::fmt::{self, Display, Formatter};

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::*;

use crate::blb::FinalEstimate;

fn styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

impl FinalEstimate {
    /// Averaged bounds and run diagnostics as a table.
    pub fn display(&self) -> String {
        let mut title_table = styled_table();
        title_table.add_row(vec![
            Cell::new("Bag of Little Bootstraps").set_alignment(CellAlignment::Center),
        ]);

        let mut table = styled_table();
        table.set_header(vec![
            Cell::new("Quantile").set_alignment(CellAlignment::Center),
            Cell::new("Averaged bound").set_alignment(CellAlignment::Center),
        ]);
        for (p, bound) in self.iter() {
            table.add_row(vec![
                Cell::new(format!("{:.1}%", p * 100.0)).set_alignment(CellAlignment::Left),
                Cell::new(format!("{bound:.4}")).set_alignment(CellAlignment::Right),
            ]);
        }

        let excluded = if self.excluded.is_empty() {
            "none".to_string()
        } else {
            self.excluded.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
        };
        table
            .add_row(vec![
                Cell::new("Subsamples"),
                Cell::new(self.subsamples()).set_alignment(CellAlignment::Right),
            ])
            .add_row(vec![
                Cell::new("Degenerate replicates"),
                Cell::new(self.degenerate_replicates()).set_alignment(CellAlignment::Right),
            ])
            .add_row(vec![
                Cell::new("Excluded"),
                Cell::new(excluded).set_alignment(CellAlignment::Right),
            ])
            .add_row(vec![
                Cell::new("Seed"),
                Cell::new(self.seed).set_alignment(CellAlignment::Right),
            ]);

        format!("{title_table}\n{table}")
    }

    /// One row per subsample: size, bounds and replicate counts.
    pub fn subsample_table(&self) -> String {
        let mut table = styled_table();
        let mut header = vec![Cell::new("Subsample"), Cell::new("Rows")];
        header.extend(
            self.quantiles
                .probs()
                .iter()
                .map(|p| Cell::new(format!("{:.1}%", p * 100.0))),
        );
        header.push(Cell::new("Usable / r"));
        table.set_header(header);

        for s in &self.summaries {
            let mut row = vec![Cell::new(s.index), Cell::new(s.rows)];
            row.extend(
                s.bounds
                    .iter()
                    .map(|b| Cell::new(format!("{b:.4}")).set_alignment(CellAlignment::Right)),
            );
            row.push(Cell::new(format!("{} / {}", s.usable, s.replicates)));
            table.add_row(row);
        }
        table.to_string()
    }
}

impl Display for FinalEstimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
