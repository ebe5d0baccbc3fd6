use std::fmt;

/// One result item (a match, team, goal, group, ...) as returned by the
/// webservice.
///
/// Attribute names mirror the XML tags of the response verbatim, values are
/// the plain text content of those tags. No schema is enforced: whatever the
/// service currently returns is what ends up in here. Insertion order follows
/// document order; a tag repeated within one element overwrites the earlier
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    attributes: Vec<(String, String)>,
}

impl Record {
    /// One attribute per element child: tag name -> direct text content.
    /// Children that themselves have element children contribute only the
    /// text directly inside them, which may well be nothing.
    pub(crate) fn from_element(element: roxmltree::Node) -> Self {
        let mut record = Record::default();
        for child in element.children().filter(|c| c.is_element()) {
            record.set(child.tag_name().name(), &direct_text(child));
        }
        record
    }

    fn set(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.attributes.iter_mut().find(|(n, _)| n == name) {
            existing.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in the order they appeared in the XML.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.attributes {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}={}", name, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Concatenated text nodes directly inside `node`, skipping anything nested
/// deeper.
pub(crate) fn direct_text(node: roxmltree::Node) -> String {
    node.children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect()
}
