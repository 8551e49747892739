//! DOM backend built on `scraper`'s html5ever tree.

use scraper::{ElementRef, Html};

use super::AnchorCandidate;

/// Element view over a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    pub fn tag_name(self) -> &'a str {
        self.0.value().name()
    }

    pub fn attribute(self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Child elements; text and comment nodes are skipped.
    pub fn children(self) -> impl Iterator<Item = Node<'a>> {
        self.0.children().filter_map(ElementRef::wrap).map(Node)
    }

    /// Element descendants in document order, excluding `self`.
    pub fn descendants(self) -> Descendants<'a> {
        let mut stack: Vec<Node<'a>> = self.children().collect();
        stack.reverse();
        Descendants { stack }
    }

    pub fn first_descendant_of_type(self, tag: &str) -> Option<Node<'a>> {
        self.descendants()
            .find(|node| node.tag_name().eq_ignore_ascii_case(tag))
    }

    pub fn text_content(self) -> String {
        self.0.text().collect()
    }
}

pub struct Descendants<'a> {
    stack: Vec<Node<'a>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let node = self.stack.pop()?;
        let mark = self.stack.len();
        self.stack.extend(node.children());
        self.stack[mark..].reverse();
        Some(node)
    }
}

/// Parses `html` into a full tree and collects every `a[href]` that has a
/// `<p>` descendant, in document order.
pub fn scan(html: &str) -> Vec<AnchorCandidate> {
    let document = Html::parse_document(html);
    let root = Node(document.root_element());

    root.descendants()
        .filter(|node| node.tag_name() == "a")
        .filter_map(|anchor| {
            let href = anchor.attribute("href")?;
            let label = anchor.first_descendant_of_type("p")?;
            Some(AnchorCandidate {
                href: href.to_string(),
                label: label.text_content(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::fixtures::PORTAL_PAGE;

    #[test]
    fn collects_anchors_with_paragraph_labels_in_order() {
        let anchors = scan(PORTAL_PAGE);
        assert_eq!(anchors.len(), 3);
        assert_eq!(
            anchors[0].href,
            "/jsp/SearchResult.jsp?degree=btech&examCode=1662"
        );
        assert_eq!(anchors[1].label, "Some Other Exam");
        assert_eq!(anchors[2].label, "M.Tech (r18) Supply");
    }

    #[test]
    fn gating_on_href_and_paragraph() {
        let html = r#"<a><p>(R18) no href</p></a><a href="/bare">(R18) no paragraph</a>"#;
        assert!(scan(html).is_empty());
    }

    #[test]
    fn first_descendant_is_found_below_intermediate_elements() {
        let document = Html::parse_fragment("<div><span><p>deep</p></span><p>shallow</p></div>");
        let root = Node(document.root_element());
        let div = root.first_descendant_of_type("div").unwrap();
        let paragraph = div.first_descendant_of_type("p").unwrap();
        assert_eq!(paragraph.text_content(), "deep");
        assert_eq!(div.children().count(), 2);
        assert!(div.attribute("class").is_none());
    }
}
