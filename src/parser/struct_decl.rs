//! Struct declaration and definition parsing.

use super::{ParseError, Parser};
use crate::ast::{slot_size, Decl, StructDef};
use crate::token::TokenKind;

impl Parser {
    /// `Name : struct ;` (forward declaration) or
    /// `Name : struct { field_decl* }` (full definition). The `struct`
    /// keyword has already been consumed by the caller.
    pub(super) fn parse_struct(&mut self, name: String) -> Result<(), ParseError> {
        let line = self.current_line();
        self.advance(); // consume 'struct'

        if self.check(&TokenKind::Semicolon) {
            self.advance();
            if !self.structs.contains(&name) {
                self.structs.insert(StructDef {
                    name,
                    complete: false,
                    size: 0,
                    fields: Vec::new(),
                });
            }
            return Ok(());
        }

        if let Some(existing) = self.structs.get(&name) {
            if existing.complete {
                return Err(ParseError::new(
                    format!("struct '{name}' is already fully defined"),
                    line,
                ));
            }
        }

        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        let mut offset = 0u32;
        while !self.check(&TokenKind::RBrace) {
            let field_line = self.current_line();
            let field_name = self.expect_identifier()?;
            self.expect(TokenKind::Colon)?;
            let field_type = self.parse_datatype()?;
            self.expect(TokenKind::Semicolon)?;

            if field_type.is_struct_value() && field_type.struct_name() == Some(name.as_str()) {
                return Err(ParseError::new(
                    format!("struct '{name}' cannot contain itself by value"),
                    field_line,
                ));
            }

            let size = slot_size(&field_type, &self.structs);
            fields.push(Decl {
                name: field_name,
                datatype: field_type,
                slot: offset,
            });
            offset += size;
        }
        self.expect(TokenKind::RBrace)?;

        let def = StructDef {
            name: name.clone(),
            complete: true,
            size: offset,
            fields,
        };
        tracing::debug!("{name} is {offset}");
        if let Some(slot) = self.structs.get_mut(&name) {
            *slot = def;
        } else {
            self.structs.insert(def);
        }
        Ok(())
    }
}
