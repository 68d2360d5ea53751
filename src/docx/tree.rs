use anyhow::bail;

use crate::docx::xml::{find_attr, XmlEvent, XmlPart};

/// One element of the document tree. `text` is the concatenated character
/// data directly under the element (for `w:t`/`w:delText` that is the run
/// text; for container elements it is inter-element whitespace and ignored).
/// The tree is read-only once built.
#[derive(Clone, Debug)]
pub struct XmlNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(name: String, attrs: Vec<(String, String)>) -> Self {
        Self {
            name,
            attrs,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        find_attr(&self.attrs, key)
    }
}

/// Folds a part's event list into a tree under a synthetic `#document` root,
/// so parts with leading PIs or multiple top-level siblings still build.
pub fn build_tree(part: &XmlPart) -> anyhow::Result<XmlNode> {
    let mut stack: Vec<XmlNode> = vec![XmlNode::new("#document".to_string(), Vec::new())];

    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, attrs } => {
                stack.push(XmlNode::new(name.clone(), attrs.clone()));
            }
            XmlEvent::Empty { name, attrs } => {
                let node = XmlNode::new(name.clone(), attrs.clone());
                stack
                    .last_mut()
                    .expect("build stack holds the document root")
                    .children
                    .push(node);
            }
            XmlEvent::Text { text } => {
                stack
                    .last_mut()
                    .expect("build stack holds the document root")
                    .text
                    .push_str(text);
            }
            XmlEvent::End { name } => {
                if stack.len() < 2 {
                    bail!("{}: unmatched </{}>", part.name, name);
                }
                let node = stack.pop().expect("checked depth above");
                if node.name != *name {
                    bail!(
                        "{}: mismatched close tag </{}> for <{}>",
                        part.name,
                        name,
                        node.name
                    );
                }
                stack
                    .last_mut()
                    .expect("checked depth above")
                    .children
                    .push(node);
            }
        }
    }

    if stack.len() != 1 {
        bail!("{}: unclosed elements at end of part", part.name);
    }
    Ok(stack.pop().expect("document root remains"))
}

/// Collects every element named `name` in document order, traversing
/// unrecognized wrappers generically. Does not descend into a match.
pub fn collect_named<'a>(node: &'a XmlNode, name: &str, out: &mut Vec<&'a XmlNode>) {
    for child in &node.children {
        if child.name == name {
            out.push(child);
        } else {
            collect_named(child, name, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::docx::xml::parse_xml_part;

    use super::{build_tree, collect_named};

    fn tree(xml: &str) -> super::XmlNode {
        let part = parse_xml_part("word/document.xml", xml.as_bytes()).expect("parse xml");
        build_tree(&part).expect("build tree")
    }

    #[test]
    fn builds_nested_elements_with_text_and_attrs() {
        let root = tree(r#"<w:p w14:paraId="AB12"><w:r><w:t>hi</w:t></w:r></w:p>"#);
        let p = &root.children[0];
        assert_eq!(p.name, "w:p");
        assert_eq!(p.attr("w14:paraId"), Some("AB12"));
        let t = &p.children[0].children[0];
        assert_eq!(t.name, "w:t");
        assert_eq!(t.text, "hi");
    }

    #[test]
    fn collect_named_sees_through_unknown_wrappers() {
        let root = tree(
            "<w:body><w:sdt><w:sdtContent><w:p/></w:sdtContent></w:sdt><w:p/></w:body>",
        );
        let mut paras = Vec::new();
        collect_named(&root, "w:p", &mut paras);
        assert_eq!(paras.len(), 2);
    }

    #[test]
    fn mismatched_close_tag_is_an_error() {
        // Rejected either by the reader or by the build stack.
        let res = parse_xml_part("word/document.xml", b"<w:p><w:r></w:p></w:r>")
            .and_then(|part| build_tree(&part));
        assert!(res.is_err());
    }

    #[test]
    fn unclosed_element_is_an_error() {
        let res = parse_xml_part("word/document.xml", b"<w:p><w:r/>")
            .and_then(|part| build_tree(&part));
        assert!(res.is_err());
    }
}
