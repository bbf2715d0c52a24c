pub type NodeId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Id(pub NodeId);

#[derive(Debug)]
pub enum NodeKind {
    Document {
        doctype: Option<String>,
    },
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

#[derive(Debug)]
struct NodeData {
    parent: Option<Id>,
    children: Vec<Id>,
    kind: NodeKind,
}

/// A document tree stored as an arena indexed by `Id`.
///
/// Nodes are never removed; `Id`s stay valid for the lifetime of the
/// document. Index 0 is always the document node.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    pub fn new() -> Self {
        Document {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document { doctype: None },
            }],
        }
    }

    pub fn root(&self) -> Id {
        Id(0)
    }

    pub fn set_doctype(&mut self, doctype: String) {
        let NodeKind::Document { doctype: dt } = &mut self.nodes[0].kind else {
            unreachable!("node 0 is always the document node");
        };
        *dt = Some(doctype);
    }

    /// Append a new child node under `parent` and return its id.
    pub fn append_child(&mut self, parent: Id, kind: NodeKind) -> Id {
        let id = Id(self.nodes.len() as NodeId);
        self.nodes.push(NodeData {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    pub fn kind(&self, id: Id) -> &NodeKind {
        &self.nodes[id.0 as usize].kind
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.nodes[id.0 as usize].parent
    }

    pub fn children(&self, id: Id) -> &[Id] {
        &self.nodes[id.0 as usize].children
    }

    pub fn child(&self, id: Id, index: u32) -> Option<Id> {
        self.children(id).get(index as usize).copied()
    }

    /// The index of `id` within its parent's child list.
    pub fn index_in_parent(&self, id: Id) -> Option<u32> {
        let parent = self.parent(id)?;
        self.children(parent)
            .iter()
            .position(|&c| c == id)
            .map(|i| i as u32)
    }

    pub fn next_sibling(&self, id: Id) -> Option<Id> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.child(parent, index + 1)
    }

    pub fn previous_sibling(&self, id: Id) -> Option<Id> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index.checked_sub(1).and_then(|i| self.child(parent, i))
    }

    pub fn is_element(&self, id: Id) -> bool {
        matches!(self.kind(id), NodeKind::Element { .. })
    }

    pub fn is_text(&self, id: Id) -> bool {
        matches!(self.kind(id), NodeKind::Text { .. })
    }

    pub fn is_comment(&self, id: Id) -> bool {
        matches!(self.kind(id), NodeKind::Comment { .. })
    }

    pub fn is_document(&self, id: Id) -> bool {
        matches!(self.kind(id), NodeKind::Document { .. })
    }

    pub fn tag_name(&self, id: Id) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element_named(&self, id: Id, target: &str) -> bool {
        self.tag_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case(target))
    }

    pub fn text(&self, id: Id) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn attribute(&self, id: Id, key: &str) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .and_then(|(_, v)| v.as_deref()),
            _ => None,
        }
    }

    /// Node length in position units: character count for text nodes,
    /// child count for everything else.
    pub fn node_len(&self, id: Id) -> u32 {
        match self.kind(id) {
            NodeKind::Text { text } => text.chars().count() as u32,
            _ => self.children(id).len() as u32,
        }
    }

    /// The character at `offset` of a text node, counting in characters.
    pub fn text_char_at(&self, id: Id, offset: u32) -> Option<char> {
        self.text(id)?.chars().nth(offset as usize)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
