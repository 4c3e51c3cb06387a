/// One layer of field options. A field definition is described by a chain of layers, from
/// the most generic to the most specific, which are merged once when the field is built.
#[derive(Debug, Default, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOptions {
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub null: Option<bool>,
    pub complexity: Option<usize>,
    /// Out-of-band values the executor injects into the raw arguments.
    pub extras: Vec<String>,
    pub extensions: Vec<String>,
    pub deprecation_reason: Option<String>,
    pub max_page_size: Option<usize>,
    pub default_page_size: Option<usize>,
    pub broadcastable: Option<bool>,
}

impl FieldOptions {
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Values set on `child` win, `extras` and `extensions` accumulate parent first.
    #[must_use]
    pub fn merge(mut self, child: &FieldOptions) -> FieldOptions {
        fn inherit<T: Clone>(parent: &mut Option<T>, child: &Option<T>) {
            if child.is_some() {
                parent.clone_from(child);
            }
        }

        fn accumulate(parent: &mut Vec<String>, child: &[String]) {
            for item in child {
                if !parent.contains(item) {
                    parent.push(item.clone());
                }
            }
        }

        inherit(&mut self.description, &child.description);
        inherit(&mut self.ty, &child.ty);
        inherit(&mut self.null, &child.null);
        inherit(&mut self.complexity, &child.complexity);
        inherit(&mut self.deprecation_reason, &child.deprecation_reason);
        inherit(&mut self.max_page_size, &child.max_page_size);
        inherit(&mut self.default_page_size, &child.default_page_size);
        inherit(&mut self.broadcastable, &child.broadcastable);
        accumulate(&mut self.extras, &child.extras);
        accumulate(&mut self.extensions, &child.extensions);

        self
    }
}

/// Flat, immutable configuration of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    description: Option<String>,
    ty: Option<String>,
    nullable: bool,
    complexity: usize,
    extras: Vec<String>,
    extensions: Vec<String>,
    deprecation_reason: Option<String>,
    max_page_size: Option<usize>,
    default_page_size: Option<usize>,
    broadcastable: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig::from_chain(std::iter::empty())
    }
}

impl FieldConfig {
    pub fn from_chain<'a>(layers: impl IntoIterator<Item = &'a FieldOptions>) -> Self {
        let options = layers
            .into_iter()
            .fold(FieldOptions::default(), |merged, layer| merged.merge(layer));

        FieldConfig {
            description: options.description,
            ty: options.ty,
            nullable: options.null.unwrap_or(true),
            complexity: options.complexity.unwrap_or(1),
            extras: options.extras,
            extensions: options.extensions,
            deprecation_reason: options.deprecation_reason,
            max_page_size: options.max_page_size,
            default_page_size: options.default_page_size,
            broadcastable: options.broadcastable.unwrap_or(false),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn ty(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn complexity(&self) -> usize {
        self.complexity
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn is_extra(&self, keyword: &str) -> bool {
        self.extras.iter().any(|extra| extra == keyword)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn deprecation_reason(&self) -> Option<&str> {
        self.deprecation_reason.as_deref()
    }

    pub fn max_page_size(&self) -> Option<usize> {
        self.max_page_size
    }

    pub fn default_page_size(&self) -> Option<usize> {
        self.default_page_size
    }

    pub fn is_broadcastable(&self) -> bool {
        self.broadcastable
    }
}
