use crate::process::NormalizedTable;

/// Plain-text grid of the normalized table: region label + columns as the
/// header, one line per region.
pub fn render_grid(table: &NormalizedTable) -> String {
    let header: Vec<&str> = std::iter::once(table.region_label.as_str())
        .chain(table.columns.iter().map(String::as_str))
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for (region, row) in table.regions.iter().zip(&table.cells) {
        widths[0] = widths[0].max(region.chars().count());
        for (c, cell) in row.iter().enumerate() {
            widths[c + 1] = widths[c + 1].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let total: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(total));
    out.push('\n');

    for (region, row) in table.regions.iter().zip(&table.cells) {
        let line: Vec<&str> = std::iter::once(region.as_str())
            .chain(row.iter().map(String::as_str))
            .collect();
        push_line(&mut out, &line, &widths);
    }
    out
}

fn push_line(out: &mut String, fields: &[&str], widths: &[usize]) {
    let parts: Vec<String> = fields
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (f, &w))| {
            let pad = " ".repeat(w.saturating_sub(f.chars().count()));
            // region left-aligned, counts right-aligned
            if i == 0 {
                format!("{}{}", f, pad)
            } else {
                format!("{}{}", pad, f)
            }
        })
        .collect();
    out.push_str(parts.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_aligned_rows() {
        let t = NormalizedTable {
            region_label: "지역".into(),
            columns: vec!["11월".into(), "12월".into()],
            regions: vec!["A".into(), "Bbbb".into()],
            cells: vec![
                vec!["10".into(), "20".into()],
                vec!["5".into(), "1500".into()],
            ],
        };
        let grid = render_grid(&t);
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines[0], "지역   | 11월 |  12월");
        assert_eq!(lines[1], "-".repeat(4 + 3 + 3 + 3 + 4));
        assert_eq!(lines[2], "A    |  10 |   20");
        assert_eq!(lines[3], "Bbbb |   5 | 1500");
    }
}
