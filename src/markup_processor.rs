use std::collections::HashMap;
use std::fmt;

use crate::errors::DocumentError;

// @module: Markup tree model, fragment collection and reinsertion

/// One node of a parsed markup document.
///
/// `Raw` carries comments, doctype declarations and other content that must
/// round-trip verbatim but never yields translatable text.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    /// An element with its attributes and ordered children
    Element {
        /// Tag name
        name: String,
        /// Attributes in source order
        attrs: Vec<(String, String)>,
        /// Child nodes in document order
        children: Vec<MarkupNode>,
    },

    /// A text leaf
    Text(String),

    /// Verbatim pass-through content (comments, doctype, processing instructions)
    Raw(String),
}

impl MarkupNode {
    /// Shorthand for an element without attributes
    pub fn element(name: impl Into<String>, children: Vec<MarkupNode>) -> Self {
        Self::Element {
            name: name.into(),
            attrs: Vec::new(),
            children,
        }
    }

    /// Shorthand for a text leaf
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// One contiguous run of human-readable text, addressed by its leaf ordinal.
///
/// `leaf_index` counts every text leaf in depth-first document order, blank
/// ones included, so the address stays valid no matter which leaves were
/// selected for translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Ordinal of the text leaf within the document
    pub leaf_index: usize,

    /// Leaf text at collection time
    pub text: String,
}

/// A parsed markup document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupDocument {
    /// Root node
    pub root: MarkupNode,
}

impl MarkupDocument {
    /// Create a document from its root node
    pub fn new(root: MarkupNode) -> Self {
        Self { root }
    }

    /// Collect the translatable fragments of this document in document order.
    ///
    /// A leaf qualifies when its trimmed content is non-empty; whitespace-only
    /// leaves keep their ordinal but are never translated.
    pub fn collect_fragments(&self) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        let mut next_leaf = 0usize;
        collect_into(&self.root, &mut next_leaf, &mut fragments);
        fragments
    }

    /// Text of the leaf at the given ordinal, if it exists
    pub fn text_leaf(&self, leaf_index: usize) -> Option<&str> {
        let mut next_leaf = 0usize;
        find_leaf(&self.root, leaf_index, &mut next_leaf)
    }

    /// Replace the text of one leaf
    pub fn set_text_leaf(&mut self, leaf_index: usize, text: String) -> Result<(), DocumentError> {
        let mut replacements = HashMap::new();
        replacements.insert(leaf_index, text);
        let replaced = self.replace_text_leaves(&replacements);
        if replaced == 1 {
            Ok(())
        } else {
            Err(DocumentError::LeafOutOfRange(leaf_index))
        }
    }

    /// Replace several leaves in one depth-first pass.
    ///
    /// Returns how many replacements were applied; indices past the last leaf
    /// are ignored.
    pub fn replace_text_leaves(&mut self, replacements: &HashMap<usize, String>) -> usize {
        let mut next_leaf = 0usize;
        let mut applied = 0usize;
        replace_into(&mut self.root, replacements, &mut next_leaf, &mut applied);
        applied
    }
}

impl fmt::Display for MarkupDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fragments = self.collect_fragments();
        writeln!(f, "Markup Document")?;
        writeln!(f, "Translatable fragments: {}", fragments.len())
    }
}

fn collect_into(node: &MarkupNode, next_leaf: &mut usize, out: &mut Vec<Fragment>) {
    match node {
        MarkupNode::Text(text) => {
            if !text.trim().is_empty() {
                out.push(Fragment {
                    leaf_index: *next_leaf,
                    text: text.clone(),
                });
            }
            *next_leaf += 1;
        }
        MarkupNode::Element { children, .. } => {
            for child in children {
                collect_into(child, next_leaf, out);
            }
        }
        MarkupNode::Raw(_) => {}
    }
}

fn find_leaf<'a>(node: &'a MarkupNode, wanted: usize, next_leaf: &mut usize) -> Option<&'a str> {
    match node {
        MarkupNode::Text(text) => {
            let current = *next_leaf;
            *next_leaf += 1;
            if current == wanted {
                Some(text.as_str())
            } else {
                None
            }
        }
        MarkupNode::Element { children, .. } => {
            for child in children {
                if let Some(found) = find_leaf(child, wanted, next_leaf) {
                    return Some(found);
                }
            }
            None
        }
        MarkupNode::Raw(_) => None,
    }
}

fn replace_into(
    node: &mut MarkupNode,
    replacements: &HashMap<usize, String>,
    next_leaf: &mut usize,
    applied: &mut usize,
) {
    match node {
        MarkupNode::Text(text) => {
            if let Some(replacement) = replacements.get(next_leaf) {
                *text = replacement.clone();
                *applied += 1;
            }
            *next_leaf += 1;
        }
        MarkupNode::Element { children, .. } => {
            for child in children {
                replace_into(child, replacements, next_leaf, applied);
            }
        }
        MarkupNode::Raw(_) => {}
    }
}

/// Parse/serialize seam to the concrete markup implementation.
///
/// Implementations own byte decoding, entity escaping and output formatting;
/// the pipeline only manipulates the tree in between.
pub trait MarkupCodec: Send + Sync {
    /// Parse resource bytes into a tree
    fn parse(&self, bytes: &[u8], encoding: &str) -> Result<MarkupDocument, DocumentError>;

    /// Serialize a tree back to bytes
    fn serialize(&self, document: &MarkupDocument) -> Result<Vec<u8>, DocumentError>;
}
