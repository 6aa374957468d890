/// HTML body to plain text
/// Keeps the table layout as column gaps so anchored fields stay on one line

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Elements whose content never reaches the text
const SKIPPED: &[&str] = &["head", "title", "script", "style", "noscript", "template"];

/// Elements that end a line
const BLOCKS: &[&str] = &[
    "p", "div", "tr", "li", "table", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
];

/// Convert an e-mail HTML body to text suitable for the extractors
pub fn html_to_text(html: &str) -> String {
    // Cells outside a <table> are dropped by the parser, so give them one.
    let lower = html.to_ascii_lowercase();
    let document = if !lower.contains("<table") && (lower.contains("<td") || lower.contains("<th")) {
        Html::parse_document(&format!("<table>{}</table>", html))
    } else {
        Html::parse_document(html)
    };

    let mut text = String::new();
    render(document.root_element(), &mut text);

    let lines: Vec<&str> = text.lines().map(|l| l.trim_end()).collect();
    let joined = lines.join("\n");
    BLANK_RUN.replace_all(joined.trim(), "\n\n").into_owned()
}

fn render(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    if SKIPPED.contains(&name) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            render(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            // Source newlines inside markup carry no layout meaning.
            out.extend(text.chars().map(|c| match c {
                '\n' | '\r' | '\u{a0}' => ' ',
                c => c,
            }));
        }
    }

    match name {
        "td" | "th" => out.push_str("  "),
        n if BLOCKS.contains(&n) => out.push('\n'),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_cells_become_column_gaps() {
        let html = "<table><tr><td>NAME/NOMBRE: PEREZ/JOSE</td><td>FOID/D.IDENTIDAD: V123</td></tr></table>";
        let text = html_to_text(html);
        assert_eq!(text, "NAME/NOMBRE: PEREZ/JOSE  FOID/D.IDENTIDAD: V123");
    }

    #[test]
    fn test_breaks_and_entities() {
        let html = "<p>ESTELAR&nbsp;C.A.</p>AV&#46; MIRANDA<br/>R&amp;D &lt;ok&gt;";
        assert_eq!(html_to_text(html), "ESTELAR C.A.\nAV. MIRANDA\nR&D <ok>");
    }

    #[test]
    fn test_named_accented_entities_decoded() {
        let html = "<table><tr><td>NAME/NOMBRE: MU&Ntilde;OZ/JOS&Eacute;</td><td>EMISI&Oacute;N</td></tr></table>";
        assert_eq!(html_to_text(html), "NAME/NOMBRE: MUÑOZ/JOSÉ  EMISIÓN");
    }

    #[test]
    fn test_bare_cells_keep_column_gaps() {
        let html = "<td>NAME/NOMBRE: MU&Ntilde;OZ/JOS&Eacute;</td><td>EMISI&Oacute;N</td>";
        assert_eq!(html_to_text(html), "NAME/NOMBRE: MUÑOZ/JOSÉ  EMISIÓN");
    }

    #[test]
    fn test_scripts_and_styles_dropped() {
        let html = "<html><head><title>x</title></head><style>p{}</style><body><script>var a=1;</script>TOTAL: USD 10.00</body></html>";
        assert_eq!(html_to_text(html), "TOTAL: USD 10.00");
    }

    #[test]
    fn test_comments_dropped() {
        let html = "<div>FARE<!-- hidden -->/TARIFA: USD 1.00</div>";
        assert_eq!(html_to_text(html), "FARE/TARIFA: USD 1.00");
    }

    #[test]
    fn test_source_newlines_ignored() {
        let html = "<div>FARE/TARIFA:\n   USD 100.00</div>";
        assert_eq!(html_to_text(html), "FARE/TARIFA:    USD 100.00");
    }
}
