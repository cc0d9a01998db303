use std::fmt;
use std::str::FromStr;

/// A reference to a declared Rust type.
///
/// Path types keep their path text (without generic arguments) and their
/// generic arguments separately. Other shapes keep their rendered text in
/// `path` and have no arguments. Two references name the same type when they
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef {
    path: String,
    args: Vec<TypeRef>,
    shape: TypeShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeShape {
    Path,
    Array,
    Slice,
    Tuple,
    Reference,
    TraitObject,
    Other,
}

impl TypeRef {
    /// A path type without generic arguments, e.g. `model::User`.
    pub fn named(path: impl Into<String>) -> TypeRef {
        TypeRef::generic(path, vec![])
    }

    pub fn generic(path: impl Into<String>, args: Vec<TypeRef>) -> TypeRef {
        TypeRef {
            path: path.into(),
            args,
            shape: TypeShape::Path,
        }
    }

    /// A non-path type, kept as rendered text.
    pub fn opaque(shape: TypeShape, text: impl Into<String>) -> TypeRef {
        TypeRef {
            path: text.into(),
            args: vec![],
            shape,
        }
    }

    pub fn option(inner: TypeRef) -> TypeRef {
        TypeRef::generic("Option", vec![inner])
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last path segment, e.g. `User` for `model::User`.
    pub fn name(&self) -> &str {
        match self.shape {
            TypeShape::Path => self.path.rsplit("::").next().unwrap_or(&self.path),
            _ => &self.path,
        }
    }

    /// The module part of the path, e.g. `model` for `model::User`.
    pub fn module(&self) -> Option<&str> {
        match self.shape {
            TypeShape::Path => self.path.rsplit_once("::").map(|(module, _)| module),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }

    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    pub fn is_path(&self) -> bool {
        self.shape == TypeShape::Path
    }

    pub fn is_option(&self) -> bool {
        self.is_path()
            && matches!(self.path.as_str(), "Option" | "std::option::Option" | "core::option::Option")
            && self.args.len() == 1
    }

    /// The type stored in the field, looking through `Option`.
    pub fn value_type(&self) -> &TypeRef {
        if self.is_option() {
            &self.args[0]
        } else {
            self
        }
    }

    /// Returns the same path with a different module, keeping the arguments.
    pub fn with_path(&self, path: impl Into<String>) -> TypeRef {
        TypeRef {
            path: path.into(),
            args: self.args.clone(),
            shape: self.shape,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl From<&str> for TypeRef {
    fn from(src: &str) -> TypeRef {
        src.parse().unwrap_or_else(|_| TypeRef::opaque(TypeShape::Other, src))
    }
}

/// Error returned when a type expression is not a plain path type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTypeError(String);

impl fmt::Display for ParseTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot parse type `{}`", self.0)
    }
}

impl std::error::Error for ParseTypeError {}

impl FromStr for TypeRef {
    type Err = ParseTypeError;

    /// Parses path types with optional generic arguments, such as
    /// `ForeignObj<String, model::User>`.
    fn from_str(src: &str) -> Result<TypeRef, ParseTypeError> {
        let mut parser = Parser { src, pos: 0 };
        let ty = parser.ty().ok_or_else(|| ParseTypeError(src.to_string()))?;
        parser.skip_ws();
        if parser.pos != src.len() {
            return Err(ParseTypeError(src.to_string()));
        }
        Ok(ty)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn ty(&mut self) -> Option<TypeRef> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == ':' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let path = &self.src[start..self.pos];
        if path.is_empty() || path.starts_with(':') || path.ends_with(':') {
            return None;
        }
        let path = path.to_string();

        self.skip_ws();
        let mut args = vec![];
        if self.peek() == Some('<') {
            self.pos += 1;
            loop {
                args.push(self.ty()?);
                self.skip_ws();
                match self.peek()? {
                    ',' => self.pos += 1,
                    '>' => {
                        self.pos += 1;
                        break;
                    }
                    _ => return None,
                }
            }
        }
        Some(TypeRef::generic(path, args))
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }
}
