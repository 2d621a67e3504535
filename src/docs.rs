use crate::registry::Registry;

const HEADERS: [&str; 3] = ["Option Class", "Option ID", "Description"];

fn bold(text: &str) -> String {
    format!("**{text}**")
}

impl Registry {
    /// Renders the options, or those under `key`, as a fixed-width text
    /// table with the columns `Option Class`, `Option ID` and `Description`.
    ///
    /// ```text
    /// ============ ========= ===========
    /// Option Class Option ID Description
    /// ============ ========= ===========
    /// **net**      **port**  listen port
    /// ============ ========= ===========
    /// ```
    ///
    /// Columns are as wide as their longest cell, and never narrower than
    /// the header.
    pub fn document(&self, key: Option<&str>) -> String {
        let rows: Vec<[String; 3]> = self
            .list(key)
            .into_iter()
            .map(|o| [bold(&o.key), bold(&o.subkey), o.description])
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let rule = widths
            .iter()
            .map(|w| "=".repeat(*w))
            .collect::<Vec<_>>()
            .join(" ");
        let line = |cells: [&str; 3]| {
            let [class, id, description] = cells;
            format!(
                "{class:<w0$} {id:<w1$} {description}",
                w0 = widths[0],
                w1 = widths[1],
            )
            .trim_end()
            .to_string()
        };

        let mut out = Vec::with_capacity(rows.len() + 4);
        out.push(rule.clone());
        out.push(line(HEADERS));
        out.push(rule.clone());
        for row in &rows {
            out.push(line([&row[0], &row[1], &row[2]]));
        }
        out.push(rule);
        out.join("\n") + "\n"
    }
}
