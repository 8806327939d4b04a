use crate::profile::{CodeTheme, PlatformProfile};
use folio_parser::dom::{self, HtmlElement, HtmlNode};
use folio_style::{rem_to_px, StyleMap};
use tracing::{debug, info, instrument};

/// Prefix forced onto retagged containers
pub const RETAG_PREFIX: &str = "box-sizing: border-box; margin: 16px 0;";

/// Box model forced onto every inlined element except images
pub const FORCED_BOX_MODEL: &str = "box-sizing: border-box";

/// Tag that replaces presentational `div`s
pub const CONTAINER_TAG: &str = "section";

/// Export document HTML for one platform
#[instrument(skip(html, profile), fields(profile = %profile.name, bytes = html.len()))]
pub fn export(html: &str, profile: &PlatformProfile) -> String {
    let mut nodes = dom::parse_html(html);

    retag_containers(&mut nodes);
    rewrite_code_blocks(&mut nodes, &profile.code_theme);
    inline_styles(&mut nodes, profile);
    strip_classes(&mut nodes);
    let shell = wrap_shell(nodes, profile);

    let output = dom::to_html(&[shell]);
    info!(output_bytes = output.len(), "Export complete");
    output
}

/// Step 1: re-emit styled or classed `div`s as `section`
pub fn retag_containers(nodes: &mut [HtmlNode]) {
    let mut retagged = 0usize;

    dom::walk_mut(nodes, &mut |el| {
        if el.tag != "div" || (el.attr("style").is_none() && el.attr("class").is_none()) {
            return;
        }

        el.tag = CONTAINER_TAG.to_string();
        let existing = el.attr("style").unwrap_or_default().trim();
        if !existing.starts_with(RETAG_PREFIX) {
            let style = format!("{} {}", RETAG_PREFIX, existing);
            el.set_attr("style", style.trim());
        }
        retagged += 1;
    });

    debug!(retagged, "Retagged containers");
}

/// Step 2: re-emit each `pre` as a themed block around a reset `code`
pub fn rewrite_code_blocks(nodes: &mut [HtmlNode], theme: &CodeTheme) {
    let theme = &theme.in_px();
    dom::walk_mut(nodes, &mut |el| {
        if el.tag != "pre" || is_code_container(el, theme) {
            return;
        }

        let text = el.text_content();
        let code = HtmlElement::new("code")
            .with_attr("style", theme.inner.as_str())
            .with_children(vec![HtmlNode::text(text)]);

        *el = HtmlElement::new("pre")
            .with_attr("style", theme.container.as_str())
            .with_children(vec![code.into()]);
    });
}

fn is_code_container(el: &HtmlElement, theme: &CodeTheme) -> bool {
    el.tag == "pre" && el.attr("style") == Some(theme.container.as_str())
}

fn is_code_inner(el: &HtmlElement, theme: &CodeTheme) -> bool {
    el.tag == "code" && el.attr("style") == Some(theme.inner.as_str())
}

/// Step 3: compute and inline the final style of every element
pub fn inline_styles(nodes: &mut [HtmlNode], profile: &PlatformProfile) {
    let theme = &profile.code_theme.in_px();

    dom::walk_mut(nodes, &mut |el| {
        if is_code_container(el, theme) || is_code_inner(el, theme) {
            return;
        }

        let existing = el.attr("style").map(StyleMap::parse).unwrap_or_default();

        let mut style = if el.tag == "img" {
            StyleMap::new()
        } else {
            StyleMap::parse(FORCED_BOX_MODEL)
        };
        if let Some(default) = profile.tag_style(&el.tag) {
            style.cascade(&StyleMap::parse(default));
        }
        style.cascade(&existing);
        style.map_values(|value| rem_to_px(value).into_owned());

        if style.is_empty() {
            el.remove_attr("style");
        } else {
            el.set_attr("style", style.serialize());
        }
    });
}

/// Step 4: drop every `class` attribute
pub fn strip_classes(nodes: &mut [HtmlNode]) {
    dom::walk_mut(nodes, &mut |el| {
        el.remove_attr("class");
    });
}

/// Step 5: wrap the body in the typography / background shell
pub fn wrap_shell(nodes: Vec<HtmlNode>, profile: &PlatformProfile) -> HtmlNode {
    let mut style = StyleMap::new();
    style.set("font-family", profile.font_family.as_str());

    if let Some(background) = &profile.background {
        for (key, value) in background.declarations() {
            style.set(key, rem_to_px(value).into_owned());
        }
    }

    HtmlElement::new(CONTAINER_TAG)
        .with_attr("style", style.serialize())
        .with_children(nodes)
        .into()
}
