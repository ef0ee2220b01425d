//! Report sinks for inspecting a run by eye.
//!
//! [`write_data_js`] dumps products and listings with token spans for a
//! client-side viewer script. [`write_viewer_html`] renders a static page
//! that groups listings by how their candidates were settled and
//! highlights the tokens a listing shares with its candidates.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use canonical::Token;
use matcher::{Listing, ListingSlot, MatchOutcome, Product};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldData<'a> {
    text: &'a str,
    token_spans: Vec<(usize, usize)>,
}

impl<'a> FieldData<'a> {
    fn new(text: &'a str, tokens: &[Token]) -> Self {
        Self {
            text,
            token_spans: tokens.iter().map(Token::span).collect(),
        }
    }
}

#[derive(Serialize)]
struct ProductData<'a> {
    id: &'a str,
    manufacturer: FieldData<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    family: Option<FieldData<'a>>,
    model: FieldData<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingData<'a> {
    id: &'a str,
    manufacturer: FieldData<'a>,
    title: FieldData<'a>,
    candidate_keys: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_candidate_key: Option<&'a str>,
}

/// Record id order: numeric ids compare as numbers and sort before any
/// other id, which compare as strings.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Candidates of a slot sorted by product id.
fn sorted_candidates<'a>(outcome: &'a MatchOutcome, slot: &ListingSlot) -> Vec<&'a Product> {
    let mut candidates: Vec<&Product> = slot.candidates.iter().map(|&p| outcome.product(p)).collect();
    candidates.sort_by(|a, b| compare_ids(&a.id, &b.id));
    candidates
}

/// Write `var products = [...];` and `var listings = [...];` statements.
pub fn write_data_js<W: Write>(outcome: &MatchOutcome, mut out: W) -> io::Result<()> {
    let products: Vec<ProductData<'_>> = outcome
        .products()
        .iter()
        .map(|product| ProductData {
            id: &product.id,
            manufacturer: FieldData::new(&product.manufacturer, &product.tokens.manufacturer),
            family: product
                .family
                .as_deref()
                .zip(product.tokens.family.as_deref())
                .map(|(text, tokens)| FieldData::new(text, tokens)),
            model: FieldData::new(&product.model, &product.tokens.model),
        })
        .collect();
    out.write_all(b"var products = ")?;
    serde_json::to_writer(&mut out, &products)?;
    out.write_all(b";\n")?;

    let listings: Vec<ListingData<'_>> = outcome
        .iter()
        .map(|(id, listing, slot)| ListingData {
            id: &listing.id,
            manufacturer: FieldData::new(&listing.manufacturer, &listing.tokens.manufacturer),
            title: FieldData::new(&listing.title, &listing.tokens.title),
            candidate_keys: sorted_candidates(outcome, slot)
                .into_iter()
                .map(|p| p.id.as_str())
                .collect(),
            best_candidate_key: outcome.best_candidate(id).map(|p| p.id.as_str()),
        })
        .collect();
    out.write_all(b"var listings = ")?;
    serde_json::to_writer(&mut out, &listings)?;
    out.write_all(b";\n")?;
    out.flush()
}

/// How a listing's candidates were settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerGroup {
    UnresolvedMultiple,
    ResolvedMultiple,
    Single,
    No,
}

impl ViewerGroup {
    pub const ALL: [ViewerGroup; 4] = [
        ViewerGroup::UnresolvedMultiple,
        ViewerGroup::ResolvedMultiple,
        ViewerGroup::Single,
        ViewerGroup::No,
    ];

    pub fn of(slot: &ListingSlot) -> Self {
        match slot.candidates.len() {
            0 => ViewerGroup::No,
            1 => ViewerGroup::Single,
            _ if slot.best_candidate.is_some() => ViewerGroup::ResolvedMultiple,
            _ => ViewerGroup::UnresolvedMultiple,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewerGroup::UnresolvedMultiple => "Unresolved multiple candidates",
            ViewerGroup::ResolvedMultiple => "Resolved multiple candidates",
            ViewerGroup::Single => "Single candidate",
            ViewerGroup::No => "No candidate",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

const PAGE_HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>listmatch: listings and candidates</title>
<style>
*{box-sizing:border-box;margin:0;padding:0}
body{font:12px/1.4 monospace;background:#0a0a0a;color:#b0b0b0;padding:8px}
h2{color:#fff;font-weight:normal;font-size:12px;border-bottom:1px solid #333;padding:4px 0;margin:16px 0 8px}
.listingContainer{border:1px solid #222;background:#0d0d0d;padding:8px;margin:4px 0}
.listing{color:#ddd;margin-bottom:4px}
.product{padding-left:16px;color:#888}
.product.selected{color:#cfc}
.pair{display:inline-block;margin-right:12px}
.key{color:#555;margin-right:4px}
.match{padding:0 1px;border-bottom:1px solid}
.match.manufacturer{background:#1a1a2e;border-color:#4a4a8a}
.match.family{background:#2e2e1a;border-color:#8a8a4a}
.match.model{background:#1a2e1a;border-color:#4a8a4a}
</style>
</head>
<body>
<div id="wrapper">
"#;

const PAGE_FOOTER: &str = "</div>\n</body>\n</html>\n";

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape `text`, wrapping each marked token in a highlight span.
///
/// Marks must come in text order; overlapping or out-of-range ones are
/// skipped.
fn highlight<'a, I>(text: &str, marks: I) -> String
where
    I: IntoIterator<Item = (&'a Token, &'a str)>,
{
    let mut html = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for (token, class) in marks {
        let (start, end) = token.span();
        if start < last {
            continue;
        }
        let (Some(before), Some(inner)) = (text.get(last..start), text.get(start..end)) else {
            continue;
        };
        html.push_str(&html_escape(before));
        html.push_str(&format!(
            r#"<span class="match {class}">{}</span>"#,
            html_escape(inner)
        ));
        last = end;
    }
    html.push_str(&html_escape(text.get(last..).unwrap_or_default()));
    html
}

fn pair(key: &str, value_html: &str, class: &str) -> String {
    format!(
        r#"<div class="pair {class}"><span class="key">{}</span><span class="value">{value_html}</span></div>"#,
        html_escape(key)
    )
}

/// Token texts of candidate fields, mapped to the field they came from.
#[derive(Default)]
struct HighlightMap<'a> {
    manufacturer: HashMap<&'a str, &'static str>,
    title: HashMap<&'a str, &'static str>,
}

fn render_product<'a>(product: &'a Product, selected: bool, marks: &mut HighlightMap<'a>) -> String {
    let class = if selected { "product selected" } else { "product" };
    let mut html = format!(r#"<div class="{class}">"#);
    html.push_str(&pair("product", &html_escape(&product.id), "id"));

    let family = product.family.as_deref().zip(product.tokens.family.as_deref());
    let fields = [
        Some(("manufacturer", product.manufacturer.as_str(), &product.tokens.manufacturer[..])),
        family.map(|(text, tokens)| ("family", text, tokens)),
        Some(("model", product.model.as_str(), &product.tokens.model[..])),
    ];
    for (name, text, tokens) in fields.into_iter().flatten() {
        html.push_str(&pair(name, &highlight(text, tokens.iter().map(|t| (t, name))), name));
    }
    html.push_str("</div>");

    for token in &product.tokens.manufacturer {
        marks.manufacturer.insert(token.text.as_str(), "manufacturer");
    }
    if let Some(tokens) = &product.tokens.family {
        for token in tokens {
            marks.title.insert(token.text.as_str(), "family");
        }
    }
    for token in &product.tokens.model {
        marks.title.insert(token.text.as_str(), "model");
    }
    html
}

fn render_listing(outcome: &MatchOutcome, listing: &Listing, slot: &ListingSlot) -> String {
    let mut marks = HighlightMap::default();
    let mut products_html = String::new();
    for product in sorted_candidates(outcome, slot) {
        let selected = slot
            .best_candidate
            .is_some_and(|best| std::ptr::eq(outcome.product(best), product));
        products_html.push_str(&render_product(product, selected, &mut marks));
    }

    let manufacturer = highlight(
        &listing.manufacturer,
        listing
            .tokens
            .manufacturer
            .iter()
            .filter_map(|t| marks.manufacturer.get(t.text.as_str()).map(|&c| (t, c))),
    );
    let title = highlight(
        &listing.title,
        listing
            .tokens
            .title
            .iter()
            .filter_map(|t| marks.title.get(t.text.as_str()).map(|&c| (t, c))),
    );

    let mut html = String::from(r#"<div class="listingContainer"><div class="listing">"#);
    html.push_str(&pair("listing", &html_escape(&listing.id), "id"));
    html.push_str(&pair("manufacturer", &manufacturer, "manufacturer"));
    html.push_str("<br>");
    html.push_str(&pair("title", &title, "title"));
    html.push_str("</div>");
    html.push_str(&products_html);
    html.push_str("</div>\n");
    html
}

/// Render the static viewer page.
pub fn write_viewer_html<W: Write>(outcome: &MatchOutcome, mut out: W) -> io::Result<()> {
    let mut groups: [Vec<String>; 4] = Default::default();
    // Input order; for synthesized ids that is line order.
    for (_, listing, slot) in outcome.iter() {
        groups[ViewerGroup::of(slot).index()].push(render_listing(outcome, listing, slot));
    }

    let total = outcome.listings().len().max(1);
    out.write_all(PAGE_HEADER.as_bytes())?;
    for group in ViewerGroup::ALL {
        let members = &groups[group.index()];
        let count = members.len();
        writeln!(
            out,
            r#"<div class="group"><h2 class="header">{}: {} listing{} ({:.1}%)</h2>"#,
            group.title(),
            count,
            if count == 1 { "" } else { "s" },
            100.0 * count as f64 / total as f64
        )?;
        for member in members {
            out.write_all(member.as_bytes())?;
        }
        out.write_all(b"</div>\n")?;
    }
    out.write_all(PAGE_FOOTER.as_bytes())?;
    out.flush()
}

/// Write `listings.html` and `js/data.js` under `dir`, creating it as
/// needed. Returns the path of the HTML page.
pub fn write_viewer_dir(outcome: &MatchOutcome, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir.join("js"))?;
    write_data_js(outcome, BufWriter::new(File::create(dir.join("js").join("data.js"))?))?;
    let html_path = dir.join("listings.html");
    write_viewer_html(outcome, BufWriter::new(File::create(&html_path)?))?;
    Ok(html_path)
}
