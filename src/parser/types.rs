//! Datatype parsing: modifiers → base type → pointer level.

use super::{ParseError, Parser};
use crate::ast::{Base, Datatype, Modifiers};
use crate::token::TokenKind;

impl Parser {
    /// True if `name` names a primitive, `string`, `null`, or a registered
    /// struct (complete or forward-declared).
    pub(super) fn check_datatype_name(&self, name: &str) -> bool {
        matches!(name, "int" | "byte" | "float" | "string" | "null") || self.structs.contains(name)
    }

    fn read_modifier(&mut self) -> Result<Modifiers, ParseError> {
        let (word, is_known_modifier) = match self.current_kind() {
            TokenKind::Const => ("const", true),
            TokenKind::Volatile => ("volatile", true),
            TokenKind::Unsigned => ("unsigned", true),
            TokenKind::Signed => ("signed", true),
            TokenKind::Static => ("static", true),
            TokenKind::Identifier(name) => (name.as_str(), false),
            other => {
                return Err(ParseError::new(
                    format!("expected a type but found {}", other.describe()),
                    self.current_line(),
                ));
            }
        };
        if !is_known_modifier {
            return if self.check_datatype_name(word) {
                Err(ParseError::new(
                    format!("unknown variable modifier '{word}'"),
                    self.current_line(),
                ))
            } else {
                Err(ParseError::new(
                    format!("unknown type name '{word}'"),
                    self.current_line(),
                ))
            };
        }
        let modifier = match word {
            "const" => Modifiers::CONST,
            "volatile" => Modifiers::VOLATILE,
            "unsigned" => Modifiers::UNSIGNED,
            "signed" => Modifiers::SIGNED,
            "static" => Modifiers::STATIC,
            _ => unreachable!(),
        };
        self.advance();
        Ok(modifier)
    }

    /// Expects to be positioned on the first modifier or the base type
    /// name; ends on the token after the last `^`.
    pub(super) fn parse_datatype(&mut self) -> Result<Datatype, ParseError> {
        let mut modifiers = Modifiers::empty();
        loop {
            let is_base = match self.current_kind() {
                TokenKind::Identifier(name) => self.check_datatype_name(name),
                _ => false,
            };
            if is_base {
                break;
            }
            modifiers.insert(self.read_modifier()?);
        }
        let name = self.expect_identifier()?;
        let base = match name.as_str() {
            "int" => Base::Int,
            "byte" => Base::Byte,
            "float" => Base::Float,
            "string" => Base::String,
            "null" => Base::Null,
            other => Base::Struct(other.to_string()),
        };
        let mut ptr_level = 0u32;
        while matches!(self.current_kind(), TokenKind::Caret) {
            ptr_level += 1;
            self.advance();
        }
        Ok(Datatype {
            base,
            ptr_level,
            modifiers,
        })
    }
}
