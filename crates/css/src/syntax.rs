// A single CSS property: "color: red"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

// input: "color: red; font-size: 12px;"
// output: vec![Declaration { name: "color", value: "red" }, Declaration { name: "font-size", value: "12px" }]
pub fn parse_declarations(input: &str) -> Vec<Declaration> {
    input
        .split(';')
        .filter_map(|pair| {
            let (n, v) = pair.split_once(':')?;
            let name = n.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            let value = v.trim().to_string();
            Some(Declaration { name, value })
        })
        .collect()
}

/// Inline style as an ordered property map.
///
/// Each property appears once. Re-inserting a property keeps its original position and
/// replaces the value, so "later declaration wins" without reordering the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == property) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((property, value)),
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == property)?;
        Some(self.entries.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `prop:value` pairs joined by `;`, no trailing separator. Empty map gives `""`.
    pub fn to_style_string(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i != 0 {
                out.push(';');
            }
            out.push_str(k);
            out.push(':');
            out.push_str(v);
        }
        out
    }
}

// input: "width: 100%; HEIGHT:50px; width: 80%"
// output: StyleMap [("width", "80%"), ("height", "50px")]
pub fn parse_style_string(input: &str) -> StyleMap {
    let mut map = StyleMap::new();
    for Declaration { name, value } in parse_declarations(input) {
        map.insert(name, value);
    }
    map
}
