use crate::common::errors::AppError;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
}

// Qualified names (`table:table-row`) are kept verbatim so prefixes survive a round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    decl: Option<BytesDecl<'static>>,
    prolog: Vec<Node>,
    pub root: Element,
    epilog: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    // Keys stay unique; an existing key keeps its position.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    pub fn push_element(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    // First descendant (pre-order, excluding `self`) matching `pred`.
    pub fn find_first<P>(&self, pred: &P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_first(pred) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_first_mut<P>(&mut self, pred: &P) -> Option<&mut Element>
    where
        P: Fn(&Element) -> bool,
    {
        for child in self.child_elements_mut() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_first_mut(pred) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_all<P>(&self, pred: &P) -> Vec<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        let mut out = Vec::new();
        self.collect_matching(pred, &mut out);
        out
    }

    fn collect_matching<'a, P>(&'a self, pred: &P, out: &mut Vec<&'a Element>)
    where
        P: Fn(&Element) -> bool,
    {
        for child in self.child_elements() {
            if pred(child) {
                out.push(child);
            }
            child.collect_matching(pred, out);
        }
    }
}

impl Document {
    pub fn parse(bytes: &[u8]) -> Result<Self, AppError> {
        let content =
            std::str::from_utf8(bytes).map_err(|e| AppError::XmlParseError(e.to_string()))?;
        Self::parse_str(content)
    }

    pub fn parse_str(content: &str) -> Result<Self, AppError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut decl = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<Element> = None;
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| AppError::XmlParseError(e.to_string()))?;
            let node = match event {
                Event::Decl(d) => {
                    decl = Some(d.into_owned());
                    continue;
                }
                Event::Start(e) => {
                    stack.push(Self::element_from_start(&e, &reader)?);
                    continue;
                }
                Event::Empty(e) => Node::Element(Self::element_from_start(&e, &reader)?),
                Event::End(e) => {
                    let element = stack.pop().ok_or_else(|| {
                        AppError::XmlParseError(format!(
                            "unexpected closing tag: {}",
                            String::from_utf8_lossy(e.name().as_ref())
                        ))
                    })?;
                    if stack.is_empty() {
                        if root.is_some() {
                            return Err(AppError::XmlParseError(
                                "multiple root elements".to_string(),
                            ));
                        }
                        root = Some(element);
                        continue;
                    }
                    Node::Element(element)
                }
                Event::Text(t) => Node::Text(t.unescape()?.into_owned()),
                Event::CData(c) => Node::CData(utf8(&c)?),
                Event::Comment(c) => Node::Comment(utf8(&c)?),
                Event::PI(p) => Node::ProcessingInstruction(utf8(&p)?),
                Event::DocType(d) => Node::DocType(utf8(&d)?),
                Event::Eof => break,
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => match (node, root.is_some()) {
                    (Node::Element(e), false) => root = Some(e),
                    (Node::Element(_), true) => {
                        return Err(AppError::XmlParseError(
                            "multiple root elements".to_string(),
                        ))
                    }
                    (other, false) => prolog.push(other),
                    (other, true) => epilog.push(other),
                },
            }
        }

        if let Some(open) = stack.last() {
            return Err(AppError::XmlParseError(format!(
                "unclosed element: {}",
                open.name
            )));
        }
        let root =
            root.ok_or_else(|| AppError::XmlParseError("document has no root".to_string()))?;

        Ok(Self {
            decl,
            prolog,
            root,
            epilog,
        })
    }

    // Serializes without re-indenting so text runs stay byte-contiguous.
    pub fn to_xml_string(&self) -> Result<String, AppError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        if let Some(decl) = &self.decl {
            writer.write_event(Event::Decl(decl.clone()))?;
        }
        for node in &self.prolog {
            Self::write_node(&mut writer, node)?;
        }
        Self::write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            Self::write_node(&mut writer, node)?;
        }

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| AppError::XmlParseError(e.to_string()))
    }

    // First element anywhere in the document, root included, matching `pred`.
    pub fn find_first<P>(&self, pred: &P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        if pred(&self.root) {
            return Some(&self.root);
        }
        self.root.find_first(pred)
    }

    pub fn find_first_mut<P>(&mut self, pred: &P) -> Option<&mut Element>
    where
        P: Fn(&Element) -> bool,
    {
        if pred(&self.root) {
            return Some(&mut self.root);
        }
        self.root.find_first_mut(pred)
    }

    pub fn find_all<P>(&self, pred: &P) -> Vec<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        let mut out = Vec::new();
        if pred(&self.root) {
            out.push(&self.root);
        }
        out.extend(self.root.find_all(pred));
        out
    }

    fn element_from_start(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Element, AppError> {
        let mut element = Element::new(utf8(e.name().as_ref())?);
        for attr in e.attributes() {
            let attr = attr?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr.decode_and_unescape_value(reader.decoder())?;
            element.set_attr(&key, &value);
        }
        Ok(element)
    }

    fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, element: &Element) -> Result<(), AppError> {
        let mut start = BytesStart::new(element.name.as_str());
        for (key, value) in &element.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if element.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        for child in &element.children {
            Self::write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
        Ok(())
    }

    fn write_node(writer: &mut Writer<Cursor<Vec<u8>>>, node: &Node) -> Result<(), AppError> {
        match node {
            Node::Element(e) => Self::write_element(writer, e)?,
            Node::Text(t) => writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(t))))?,
            Node::CData(t) => writer.write_event(Event::CData(BytesCData::new(t.as_str())))?,
            Node::Comment(t) => writer.write_event(Event::Comment(BytesText::from_escaped(t.as_str())))?,
            Node::ProcessingInstruction(t) => writer.write_event(Event::PI(BytesPI::new(t.as_str())))?,
            Node::DocType(t) => writer.write_event(Event::DocType(BytesText::from_escaped(t.as_str())))?,
        }
        Ok(())
    }
}

fn utf8(bytes: &[u8]) -> Result<String, AppError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| AppError::XmlParseError(e.to_string()))
}
