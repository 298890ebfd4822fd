use crate::mapper::local_path_for;
use crate::result::{AssetKind, DiscoveredAsset, ExtractionResult};
use ego_tree::NodeId;
use scraper::node::Node;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

/// Attribute-bearing sources, scanned in this fixed order. Scripts come
/// first so they lead the final discovery order.
const ATTRIBUTE_SOURCES: [(&str, &str, AssetKind); 5] = [
    ("script[src]", "src", AssetKind::Script),
    ("form[action]", "action", AssetKind::FormAction),
    ("a[href]", "href", AssetKind::Anchor),
    ("img[src]", "src", AssetKind::Image),
    ("link[href]", "href", AssetKind::Link),
];

/// Scan a page for asset references, rewriting each mappable one in place to
/// its local path and collecting the de-duplicated download set.
///
/// Rewriting and extraction share a single traversal: an attribute is
/// mutated at most once, and only when its resolved URL mapped to a local
/// path. References the mapper rejects are left exactly as found. A bad
/// value on one element never aborts the scan of the rest.
pub fn extract_and_rewrite(html: &str, base_url: &Url) -> ExtractionResult {
    let mut document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut assets: Vec<DiscoveredAsset> = Vec::new();
    let mut rewrites = 0usize;

    for (selector, attr, kind) in ATTRIBUTE_SOURCES {
        scan_attribute_source(
            &mut document,
            selector,
            attr,
            kind,
            base_url,
            &mut seen,
            &mut assets,
            &mut rewrites,
        );
    }

    scan_button_handlers(&mut document, base_url, &mut seen, &mut assets, &mut rewrites);

    info!(
        "Extracted {} distinct assets ({} rewrites) from {}",
        assets.len(),
        rewrites,
        base_url
    );

    ExtractionResult {
        html: document.html(),
        assets,
        rewrites,
    }
}

fn scan_attribute_source(
    document: &mut Html,
    selector: &str,
    attr: &str,
    kind: AssetKind,
    base_url: &Url,
    seen: &mut HashSet<String>,
    assets: &mut Vec<DiscoveredAsset>,
    rewrites: &mut usize,
) {
    let selector = Selector::parse(selector).unwrap();

    // Selecting borrows the document, so collect candidates before mutating.
    let candidates: Vec<(NodeId, String)> = document
        .select(&selector)
        .filter_map(|element| {
            element
                .value()
                .attr(attr)
                .map(|raw| (element.id(), raw.to_string()))
        })
        .collect();

    for (node_id, raw) in candidates {
        let Some(resolved) = resolve_reference(base_url, &raw) else {
            continue;
        };
        let Some(local) = local_path_for(resolved.as_str(), true) else {
            continue;
        };

        debug!("Rewriting {} {}=\"{}\" -> {}", selector_name(kind), attr, raw, local);
        set_attribute(document, node_id, attr, &local);
        *rewrites += 1;

        record_discovery(resolved, kind, seen, assets);
    }
}

/// Buttons carry navigation in inline click handlers. The recognized grammar
/// is deliberately narrow: whitespace removed, the text after the first
/// `location.href=` taken, an optional leading quote of any of the three
/// common styles stripped, and the target must start with `/`. Anything
/// else (`doSomething()` and friends) is ignored.
fn scan_button_handlers(
    document: &mut Html,
    base_url: &Url,
    seen: &mut HashSet<String>,
    assets: &mut Vec<DiscoveredAsset>,
    rewrites: &mut usize,
) {
    let selector = Selector::parse("button[onclick]").unwrap();

    let candidates: Vec<(NodeId, String)> = document
        .select(&selector)
        .filter_map(|element| {
            element
                .value()
                .attr("onclick")
                .and_then(navigation_target)
                .map(|target| (element.id(), target))
        })
        .collect();

    for (node_id, target) in candidates {
        let Some(resolved) = resolve_reference(base_url, &target) else {
            continue;
        };
        let Some(local) = local_path_for(resolved.as_str(), true) else {
            continue;
        };

        debug!("Rewriting button handler {} -> location.href={}", target, local);
        set_attribute(document, node_id, "onclick", &format!("location.href={}", local));
        *rewrites += 1;

        record_discovery(resolved, AssetKind::ButtonNavigation, seen, assets);
    }
}

/// Pull a `location.href` assignment target out of an inline handler.
pub fn navigation_target(handler: &str) -> Option<String> {
    let compact: String = handler.chars().filter(|c| !c.is_whitespace()).collect();
    let rest = compact.split_once("location.href=")?.1;
    let rest = rest.strip_prefix(['\'', '"', '`']).unwrap_or(rest);
    let end = rest.find(['\'', '"', '`', ';']).unwrap_or(rest.len());
    let target = &rest[..end];

    if target.starts_with('/') {
        Some(target.to_string())
    } else {
        None
    }
}

/// Resolve a raw attribute value against the page URL. Handles absolute
/// URLs, `//host/path`, `/path`, `relative/path` and query/fragment-only
/// forms per standard relative resolution. Fragments are dropped so
/// same-document anchors dedupe onto the page URL itself.
fn resolve_reference(base_url: &Url, raw: &str) -> Option<Url> {
    if raw.is_empty() {
        return None;
    }
    let mut resolved = base_url.join(raw).ok()?;
    resolved.set_fragment(None);
    Some(resolved)
}

/// Append the query-stripped URL to the discovery set, first occurrence only.
fn record_discovery(
    mut resolved: Url,
    kind: AssetKind,
    seen: &mut HashSet<String>,
    assets: &mut Vec<DiscoveredAsset>,
) {
    resolved.set_query(None);
    let stripped = resolved.to_string();
    if seen.insert(stripped.clone()) {
        assets.push(DiscoveredAsset { url: stripped, kind });
    }
}

fn set_attribute(document: &mut Html, node_id: NodeId, attr: &str, value: &str) {
    if let Some(mut node) = document.tree.get_mut(node_id)
        && let Node::Element(element) = node.value()
    {
        for (name, existing) in element.attrs.iter_mut() {
            if &*name.local == attr {
                existing.clear();
                existing.push_slice(value);
            }
        }
    }
}

fn selector_name(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Script => "script",
        AssetKind::FormAction => "form",
        AssetKind::Anchor => "a",
        AssetKind::Image => "img",
        AssetKind::Link => "link",
        AssetKind::ButtonNavigation => "button",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    fn asset_urls(result: &ExtractionResult) -> Vec<&str> {
        result.assets.iter().map(|a| a.url.as_str()).collect()
    }

    #[test]
    fn test_duplicate_references_rewrite_both_discover_once() {
        let html = r#"<html><body>
            <img src="/img/a.png">
            <a href="/img/a.png">same file</a>
        </body></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert_eq!(result.rewrites, 2);
        assert_eq!(asset_urls(&result), vec!["https://example.com/img/a.png"]);
        assert!(result.html.contains(r#"<img src="img/a.png">"#));
        assert!(result.html.contains(r#"<a href="img/a.png">"#));
    }

    #[test]
    fn test_protocol_relative_script_keeps_query_in_rewrite() {
        let html = r#"<html><head><script src="//cdn.example.com/lib.js?v=2"></script></head></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert!(result.html.contains(r#"<script src="lib.js?v=2">"#));
        assert_eq!(asset_urls(&result), vec!["https://cdn.example.com/lib.js"]);
        assert_eq!(result.assets[0].kind, AssetKind::Script);
    }

    #[test]
    fn test_scripts_lead_discovery_order() {
        let html = r#"<html><body>
            <img src="/one.png">
            <script src="/app.js"></script>
            <a href="/two.html">x</a>
        </body></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert_eq!(
            asset_urls(&result),
            vec![
                "https://example.com/app.js",
                "https://example.com/two.html",
                "https://example.com/one.png",
            ]
        );
    }

    #[test]
    fn test_root_url_left_untouched() {
        let html = r#"<html><body><a href="https://example.com">home</a></body></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert_eq!(result.rewrites, 0);
        assert!(result.assets.is_empty());
        assert!(result.html.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn test_unmappable_schemes_left_untouched() {
        let html = r#"<html><body>
            <a href="mailto:root@example.com">mail</a>
            <a href="javascript:void(0)">nothing</a>
        </body></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert_eq!(result.rewrites, 0);
        assert!(result.assets.is_empty());
        assert!(result.html.contains("mailto:root@example.com"));
    }

    #[test]
    fn test_relative_form_action_resolved_against_page_path() {
        let base = Url::parse("https://example.com/app/").unwrap();
        let html = r#"<html><body><form action="submit"><input></form></body></html>"#;

        let result = extract_and_rewrite(html, &base);

        assert!(result.html.contains(r#"action="app/submit""#));
        assert_eq!(asset_urls(&result), vec!["https://example.com/app/submit"]);
    }

    #[test]
    fn test_button_navigation_handler_rewritten() {
        let html = r#"<html><body>
            <button onclick="location.href='/go'">go</button>
            <button onclick="doSomething()">other</button>
        </body></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert_eq!(result.rewrites, 1);
        assert!(result.html.contains(r#"onclick="location.href=go""#));
        assert!(result.html.contains(r#"onclick="doSomething()""#));
        assert_eq!(asset_urls(&result), vec!["https://example.com/go"]);
        assert_eq!(result.assets[0].kind, AssetKind::ButtonNavigation);
    }

    #[test]
    fn test_navigation_target_grammar() {
        assert_eq!(navigation_target("location.href='/go'"), Some("/go".to_string()));
        assert_eq!(
            navigation_target(r#"location.href = "/a/b.html";"#),
            Some("/a/b.html".to_string())
        );
        assert_eq!(navigation_target("location.href=`/x`"), Some("/x".to_string()));
        // Relative targets and unrelated handlers are out of grammar
        assert_eq!(navigation_target("location.href='next.html'"), None);
        assert_eq!(navigation_target("doSomething()"), None);
        assert_eq!(navigation_target(""), None);
    }

    #[test]
    fn test_fragment_only_anchor_dedupes_onto_page() {
        let base = Url::parse("https://example.com/docs/page.html").unwrap();
        let html = r##"<html><body>
            <a href="#top">top</a>
            <a href="page.html">self</a>
        </body></html>"##;

        let result = extract_and_rewrite(html, &base);

        // Both resolve to the page URL once the fragment is gone
        assert_eq!(asset_urls(&result), vec!["https://example.com/docs/page.html"]);
        assert_eq!(result.rewrites, 2);
    }

    #[test]
    fn test_stylesheet_links_discovered() {
        let html = r#"<html><head><link rel="stylesheet" href="/static/site.css"></head></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert!(result.html.contains(r#"href="static/site.css""#));
        assert_eq!(asset_urls(&result), vec!["https://example.com/static/site.css"]);
        assert_eq!(result.assets[0].kind, AssetKind::Link);
    }

    #[test]
    fn test_doctype_survives_rewrite() {
        let html = r#"<!DOCTYPE html><html><head><script src="/app.js"></script></head><body></body></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert!(result.html.starts_with("<!DOCTYPE html>"));
        assert!(result.html.contains(r#"src="app.js""#));
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        let result = extract_and_rewrite("", &base());
        assert!(result.assets.is_empty());
        assert_eq!(result.rewrites, 0);
    }

    #[test]
    fn test_empty_attribute_values_skipped() {
        let html = r#"<html><body><img src=""><a href="">x</a></body></html>"#;

        let result = extract_and_rewrite(html, &base());

        assert!(result.assets.is_empty());
        assert_eq!(result.rewrites, 0);
    }
}
