//! The type-signature string grammar (§4.4):
//!
//! ```text
//! sig      := optional ('->' optional)?
//! optional := base '?'?
//! base     := prim | name | 'l<' optional '>' | '{}'
//! prim     := 'i' | 'd' | 's' | 'b' | 'a' | 'n'
//! name     := uppercase identifier (resolved to a native Class declared
//!             earlier in this module)
//! ```
//!
//! A signature without `->` describes a value type (used for fields); one
//! with `->` describes a function's parameter list (parsed one
//! `optional` at a time, with no separator between parameters — each
//! `base` is self-delimiting) followed by its return type. A single `...`
//! immediately before `->` marks the signature variadic.
//!
//! A hand-rolled recursive-descent scanner over the raw byte string, not a
//! parser-combinator crate — these compact signatures are simple enough to
//! decode inline.

use crate::error::AbiError;
use angara_types::{PrimitiveKind, Type};
use rustc_hash::FxHashMap;
use std::rc::Rc;

pub struct SignatureParser<'a> {
    bytes: &'a [u8],
    pos: usize,
    source: &'a str,
    known_classes: &'a FxHashMap<String, Type>,
}

impl<'a> SignatureParser<'a> {
    #[must_use]
    pub fn new(source: &'a str, known_classes: &'a FxHashMap<String, Type>) -> Self {
        SignatureParser { bytes: source.as_bytes(), pos: 0, source, known_classes }
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn consume(&mut self, expected: char) -> Result<(), AbiError> {
        match self.advance() {
            None => Err(AbiError::UnexpectedEof),
            Some(found) if found == expected => Ok(()),
            Some(found) => Err(AbiError::UnexpectedChar {
                expected,
                found,
                signature: self.source.to_string(),
            }),
        }
    }

    /// Consumes a literal `...`, used by the caller to detect a trailing
    /// variadic marker immediately before `->`.
    pub fn consume_variadic(&mut self) -> Result<(), AbiError> {
        self.consume('.')?;
        self.consume('.')?;
        self.consume('.')
    }

    /// `optional := base '?'?`
    pub fn parse_optional(&mut self) -> Result<Type, AbiError> {
        let base = self.parse_base()?;
        if self.peek() == Some('?') {
            self.advance();
            return Ok(base.optional());
        }
        Ok(base)
    }

    #[allow(clippy::expect_used, reason = "start/pos only ever advance across ASCII bytes of a &str source")]
    fn parse_base(&mut self) -> Result<Type, AbiError> {
        let c = self.peek().ok_or(AbiError::UnexpectedEof)?;

        if c.is_ascii_uppercase() {
            let start = self.pos;
            while let Some(ch) = self.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    self.advance();
                } else {
                    break;
                }
            }
            let name = std::str::from_utf8(&self.bytes[start..self.pos])
                .expect("signature source is valid UTF-8")
                .to_string();
            return self.known_classes.get(&name).cloned().ok_or_else(|| AbiError::UnknownClass {
                name,
                signature: self.source.to_string(),
            });
        }

        self.advance();
        Ok(match c {
            'i' => Type::Primitive(PrimitiveKind::I64),
            'd' => Type::Primitive(PrimitiveKind::F64),
            's' => Type::Primitive(PrimitiveKind::String),
            'b' => Type::Primitive(PrimitiveKind::Bool),
            'a' => Type::Any,
            'n' => Type::Nil,
            'l' => {
                self.consume('<')?;
                let element = self.parse_optional()?;
                self.consume('>')?;
                Type::List(Rc::new(element))
            }
            '{' => {
                self.consume('}')?;
                Type::Record(Rc::new(FxHashMap::default()))
            }
            found => return Err(AbiError::InvalidTypeChar { found, signature: self.source.to_string() }),
        })
    }
}

/// A decoded signature: either a bare value type (field signatures have no
/// `->`) or a function shape (parameter types, variadic flag, return type).
pub enum DecodedSignature {
    Value(Type),
    Function { params: Vec<Type>, variadic: bool, ret: Type },
}

/// Parse one complete signature string to exhaustion. A `->` anywhere in
/// the string makes it function-shaped; otherwise it is a single value
/// type and must be exhausted by the one `parse_optional` call.
#[allow(clippy::expect_used, reason = "params.len() == 1 is checked just above")]
pub fn parse_signature(source: &str, known_classes: &FxHashMap<String, Type>) -> Result<DecodedSignature, AbiError> {
    let mut parser = SignatureParser::new(source, known_classes);

    let mut params = Vec::new();
    let mut variadic = false;
    let mut saw_arrow = false;

    loop {
        if parser.is_at_end() {
            break;
        }
        if parser.peek() == Some('-') {
            saw_arrow = true;
            parser.consume('-')?;
            parser.consume('>')?;
            break;
        }
        params.push(parser.parse_optional()?);
        if parser.peek() == Some('.') {
            parser.consume_variadic()?;
            variadic = true;
            if !parser.is_at_end() && parser.peek() != Some('-') {
                return Err(AbiError::VariadicNotLast { signature: source.to_string() });
            }
        }
    }

    if !saw_arrow {
        // No `->` was ever seen: this is a bare value-type signature. It
        // must describe exactly one type and nothing else.
        if params.len() == 1 && !variadic {
            if !parser.is_at_end() {
                return Err(AbiError::TrailingCharacters { signature: source.to_string() });
            }
            return Ok(DecodedSignature::Value(params.into_iter().next().expect("len checked above")));
        }
        return Err(AbiError::TrailingCharacters { signature: source.to_string() });
    }

    let ret = parser.parse_optional()?;
    if !parser.is_at_end() {
        return Err(AbiError::TrailingCharacters { signature: source.to_string() });
    }
    Ok(DecodedSignature::Function { params, variadic, ret })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> FxHashMap<String, Type> {
        FxHashMap::default()
    }

    #[test]
    fn test_parse_value_primitive() {
        let result = parse_signature("s", &classes()).unwrap();
        match result {
            DecodedSignature::Value(ty) => assert_eq!(ty, Type::Primitive(PrimitiveKind::String)),
            DecodedSignature::Function { .. } => panic!("expected value signature"),
        }
    }

    #[test]
    fn test_parse_function_simple() {
        let result = parse_signature("s->s", &classes()).unwrap();
        match result {
            DecodedSignature::Function { params, variadic, ret } => {
                assert_eq!(params, vec![Type::Primitive(PrimitiveKind::String)]);
                assert!(!variadic);
                assert_eq!(ret, Type::Primitive(PrimitiveKind::String));
            }
            DecodedSignature::Value(_) => panic!("expected function signature"),
        }
    }

    #[test]
    fn test_parse_function_no_params() {
        let result = parse_signature("->n", &classes()).unwrap();
        match result {
            DecodedSignature::Function { params, ret, .. } => {
                assert!(params.is_empty());
                assert_eq!(ret, Type::Nil);
            }
            DecodedSignature::Value(_) => panic!("expected function signature"),
        }
    }

    #[test]
    fn test_parse_optional_suffix() {
        let result = parse_signature("s?->n", &classes()).unwrap();
        match result {
            DecodedSignature::Function { params, .. } => {
                assert_eq!(params[0], Type::Primitive(PrimitiveKind::String).optional());
            }
            DecodedSignature::Value(_) => panic!("expected function signature"),
        }
    }

    #[test]
    fn test_parse_list_type() {
        let result = parse_signature("l<i>->n", &classes()).unwrap();
        match result {
            DecodedSignature::Function { params, .. } => {
                assert_eq!(params[0], Type::List(Rc::new(Type::Primitive(PrimitiveKind::I64))));
            }
            DecodedSignature::Value(_) => panic!("expected function signature"),
        }
    }

    #[test]
    fn test_parse_record_type() {
        let result = parse_signature("{}", &classes()).unwrap();
        match result {
            DecodedSignature::Value(Type::Record(fields)) => assert!(fields.is_empty()),
            _ => panic!("expected empty-record value signature"),
        }
    }

    #[test]
    fn test_parse_variadic() {
        let result = parse_signature("i...->n", &classes()).unwrap();
        match result {
            DecodedSignature::Function { params, variadic, .. } => {
                assert_eq!(params.len(), 1);
                assert!(variadic);
            }
            DecodedSignature::Value(_) => panic!("expected function signature"),
        }
    }

    #[test]
    fn test_parse_multi_param() {
        let result = parse_signature("isb->n", &classes()).unwrap();
        match result {
            DecodedSignature::Function { params, .. } => {
                assert_eq!(params.len(), 3);
                assert_eq!(params[0], Type::Primitive(PrimitiveKind::I64));
                assert_eq!(params[1], Type::Primitive(PrimitiveKind::String));
                assert_eq!(params[2], Type::Primitive(PrimitiveKind::Bool));
            }
            DecodedSignature::Value(_) => panic!("expected function signature"),
        }
    }

    #[test]
    fn test_unknown_class_errors() {
        let err = parse_signature("Frobnicator->n", &classes()).unwrap_err();
        assert!(matches!(err, AbiError::UnknownClass { .. }));
    }

    #[test]
    fn test_known_class_resolves() {
        let mut classes = classes();
        classes.insert("Point".to_string(), Type::CPtr);
        let result = parse_signature("Point->n", &classes).unwrap();
        match result {
            DecodedSignature::Function { params, .. } => assert_eq!(params[0], Type::CPtr),
            DecodedSignature::Value(_) => panic!("expected function signature"),
        }
    }

    #[test]
    fn test_trailing_characters_rejected() {
        let err = parse_signature("sx", &classes()).unwrap_err();
        assert!(matches!(err, AbiError::TrailingCharacters { .. }));
    }

    #[test]
    fn test_variadic_must_be_last() {
        let err = parse_signature("i...s->n", &classes()).unwrap_err();
        assert!(matches!(err, AbiError::VariadicNotLast { .. }));
    }
}
