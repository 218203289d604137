use crate::{Error, Result, llm::ChatMessage};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A text template with `{name}` placeholders. `{{` and `}}` produce
/// literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) | None => {
                                return Err(Error::template(format!(
                                    "Unclosed placeholder at offset {pos}"
                                )));
                            }
                            Some((_, ch)) => name.push(ch),
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(Error::template(format!(
                            "Empty placeholder at offset {pos}"
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name.to_string()));
                }
                '}' => {
                    return Err(Error::template(format!(
                        "Unmatched '}}' at offset {pos}"
                    )));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    pub fn input_variables(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitutes every placeholder. Values are inserted as-is.
    pub fn format(&self, variables: &HashMap<&str, &str>) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = variables.get(name.as_str()).ok_or_else(|| {
                        Error::template(format!("Missing value for template variable '{name}'"))
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

impl FromStr for PromptTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// An ordered list of role-tagged templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPromptTemplate {
    messages: Vec<(String, PromptTemplate)>,
}

impl ChatPromptTemplate {
    /// Accepts `system`, `human`/`user` and `ai`/`assistant` roles.
    pub fn from_messages<I, R, T>(messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = (R, T)>,
        R: AsRef<str>,
        T: AsRef<str>,
    {
        let messages = messages
            .into_iter()
            .map(|(role, template)| {
                let role = normalize_role(role.as_ref())?;
                Ok((role.to_string(), PromptTemplate::parse(template.as_ref())?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { messages })
    }

    pub fn input_variables(&self) -> BTreeSet<&str> {
        self.messages
            .iter()
            .flat_map(|(_, template)| template.input_variables())
            .collect()
    }

    pub fn format_messages(&self, variables: &HashMap<&str, &str>) -> Result<Vec<ChatMessage>> {
        self.messages
            .iter()
            .map(|(role, template)| Ok(ChatMessage::text(role.clone(), template.format(variables)?)))
            .collect()
    }
}

fn normalize_role(role: &str) -> Result<&'static str> {
    match role {
        "system" => Ok("system"),
        "human" | "user" => Ok("user"),
        "ai" | "assistant" => Ok("assistant"),
        other => Err(Error::template(format!("Unknown message role: {other}"))),
    }
}
