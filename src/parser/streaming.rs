use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lol_html::errors::RewritingError;
use lol_html::html_content::{Doctype, EndTag};
use lol_html::{HtmlRewriter, MemorySettings, Settings, doctype, element, text};

use super::{AnchorCandidate, ParserProbe};

/// Start tags that close an open `<p>` in any document mode.
const PARAGRAPH_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "dd", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hgroup", "hr", "li", "listing", "main", "menu", "nav", "ol",
    "plaintext", "pre", "section", "summary", "ul", "xmp",
];

const QUIRKS_PUBLIC_IDS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

const QUIRKS_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

// Quirky only when the doctype has no system identifier.
const QUIRKS_WITHOUT_SYSTEM_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

const QUIRKS_SYSTEM_ID: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

#[derive(Default)]
struct OpenAnchor {
    href: Option<String>,
    label: Option<String>,
    /// Still on the stack of open elements.
    open: bool,
    /// The anchor's first `<p>` has not been closed yet; its text is the label.
    paragraph_open: bool,
}

impl OpenAnchor {
    fn close(&mut self) {
        // A paragraph still open here is moved out of the anchor by the tree builder.
        if self.paragraph_open {
            self.label = None;
            self.paragraph_open = false;
        }
        self.open = false;
    }
}

type Anchors = Rc<RefCell<Vec<OpenAnchor>>>;

pub fn probe(html: &str, memory_limit: usize) -> ParserProbe {
    match scan(html, memory_limit) {
        Ok(anchors) => ParserProbe::Available(anchors),
        Err(e) => ParserProbe::Unavailable(e.to_string()),
    }
}

/// Streams `html` through `lol_html`, collecting every `a[href]` whose first
/// `<p>` descendant survives tree construction.
///
/// lol_html keeps no tree, so the tree builder's effect on anchors and
/// paragraphs is tracked here: one anchor is open at a time, and the label
/// paragraph ends at `</p>`, at another `<p>`, or at a start tag that closes
/// paragraphs (`<table>` only outside quirks mode).
pub fn scan(html: &str, memory_limit: usize) -> Result<Vec<AnchorCandidate>, RewritingError> {
    let anchors: Anchors = Rc::default();
    let standards_mode = Cell::new(false);

    let mut memory_settings = MemorySettings::default();
    memory_settings.max_allowed_memory_usage = memory_limit;

    let mut element_content_handlers = vec![
        element!("a", |el| {
            let index = open_anchor(&anchors, el.get_attribute("href"));
            if let Some(handlers) = el.end_tag_handlers() {
                let anchors = Rc::clone(&anchors);
                handlers.push(Box::new(move |_: &mut EndTag| {
                    if let Some(anchor) = anchors.borrow_mut().get_mut(index) {
                        anchor.close();
                    }
                    Ok(())
                }) as lol_html::EndTagHandler<'static>);
            }
            Ok(())
        }),
        element!("a p", |el| {
            let index = {
                let mut stack = anchors.borrow_mut();
                let index = stack.len().saturating_sub(1);
                let Some(anchor) = stack.last_mut().filter(|anchor| anchor.open) else {
                    return Ok(());
                };
                if anchor.label.is_some() {
                    // Any later <p> implicitly closes the label paragraph.
                    anchor.paragraph_open = false;
                    return Ok(());
                }
                anchor.label = Some(String::new());
                anchor.paragraph_open = true;
                index
            };
            if let Some(handlers) = el.end_tag_handlers() {
                let anchors = Rc::clone(&anchors);
                handlers.push(Box::new(move |_: &mut EndTag| {
                    if let Some(anchor) = anchors.borrow_mut().get_mut(index) {
                        anchor.paragraph_open = false;
                    }
                    Ok(())
                }) as lol_html::EndTagHandler<'static>);
            }
            Ok(())
        }),
        element!("a p table", |_| {
            if standards_mode.get() {
                close_paragraph(&anchors);
            }
            Ok(())
        }),
        text!("a p", |t| {
            if let Some(anchor) = anchors.borrow_mut().last_mut()
                && anchor.open
                && anchor.paragraph_open
                && let Some(label) = anchor.label.as_mut()
            {
                label.push_str(t.as_str());
            }
            Ok(())
        }),
    ];
    for tag in PARAGRAPH_CLOSERS {
        element_content_handlers.push(element!(format!("a p {}", tag), |_| {
            close_paragraph(&anchors);
            Ok(())
        }));
    }

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers,
            document_content_handlers: vec![doctype!(|doctype| {
                standards_mode.set(!is_quirks(doctype));
                Ok(())
            })],
            memory_settings,
            ..Settings::new()
        },
        |_: &[u8]| {},
    );

    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    let candidates = anchors
        .take()
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.href?;
            let label = anchor.label?;
            Some(AnchorCandidate {
                href: decode(&href),
                label: decode(&label),
            })
        })
        .collect();

    Ok(candidates)
}

/// Opening an `<a>` closes the previous one if it is still open.
fn open_anchor(anchors: &Anchors, href: Option<String>) -> usize {
    let mut stack = anchors.borrow_mut();
    if let Some(previous) = stack.last_mut()
        && previous.open
    {
        previous.close();
    }
    stack.push(OpenAnchor {
        href,
        open: true,
        ..OpenAnchor::default()
    });
    stack.len() - 1
}

fn close_paragraph(anchors: &Anchors) {
    if let Some(anchor) = anchors.borrow_mut().last_mut()
        && anchor.open
    {
        anchor.paragraph_open = false;
    }
}

fn is_quirks(doctype: &Doctype) -> bool {
    if !doctype
        .name()
        .is_some_and(|name| name.eq_ignore_ascii_case("html"))
    {
        return true;
    }

    let system = doctype.system_id().map(|id| id.to_ascii_lowercase());
    if system.as_deref() == Some(QUIRKS_SYSTEM_ID) {
        return true;
    }

    let Some(public) = doctype.public_id().map(|id| id.to_ascii_lowercase()) else {
        return false;
    };
    QUIRKS_PUBLIC_IDS.contains(&public.as_str())
        || QUIRKS_PUBLIC_PREFIXES
            .iter()
            .any(|prefix| public.starts_with(prefix))
        || (system.is_none()
            && QUIRKS_WITHOUT_SYSTEM_PREFIXES
                .iter()
                .any(|prefix| public.starts_with(prefix)))
}

// lol_html hands out raw source text, character references included.
fn decode(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}
