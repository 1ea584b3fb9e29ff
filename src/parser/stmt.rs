use crate::{
    ast::{
        ast::{Class, Field, Formal, Member, Method},
        expressions::ExprId,
        statements::{BlockStmt, DeclStmt, ExprStmt, ForStmt, IfStmt, ReturnStmt, Stmt, WhileStmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

/// `Type name` starts a declaration; `Type[] name` too.
fn at_declaration(parser: &Parser) -> bool {
    if parser.current_token_kind() != TokenKind::Identifier {
        return false;
    }

    match parser.peek_kind(1) {
        TokenKind::Identifier => true,
        TokenKind::OpenBracket => parser.peek_kind(2) == TokenKind::CloseBracket,
        _ => false,
    }
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    if at_declaration(parser) {
        return parse_typed_decl_stmt(parser);
    }

    let line = parser.current_line();
    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Expr(ExprStmt { expr, line }))
}

fn parse_decl_rest(parser: &mut Parser, name: String, line: u32, ty: Option<Type>) -> Result<Stmt, Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("local variables must be initialized"),
        },
        parser.get_position(),
    );
    parser.expect_error(TokenKind::Assignment, Some(error))?;
    let init = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Decl(DeclStmt { name, ty, init, line }))
}

/// `Type name = init;`
pub fn parse_typed_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.current_line();
    let ty = parse_type(parser, BindingPower::Default)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    parse_decl_rest(parser, name, line, Some(ty))
}

/// `var name = init;`
pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line();

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier during variable declaration"),
        },
        parser.get_position(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    parse_decl_rest(parser, name, line, None)
}

fn parse_predicate(parser: &mut Parser) -> Result<ExprId, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let predicate = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(predicate)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line();

    let predicate = parse_predicate(parser)?;
    let then_stmt = Box::new(parse_stmt(parser)?);

    let else_stmt = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt { predicate, then_stmt, else_stmt, line }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line();

    let predicate = parse_predicate(parser)?;
    let body = Box::new(parse_stmt(parser)?);

    Ok(Stmt::While(WhileStmt { predicate, body, line }))
}

/// `for (init?; predicate?; update?) body`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line();
    parser.expect(TokenKind::OpenParen)?;

    let clause = |parser: &mut Parser, terminator: TokenKind| -> Result<Option<ExprId>, Error> {
        let expr = if parser.current_token_kind() != terminator {
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };
        parser.expect(terminator)?;
        Ok(expr)
    };

    let init = clause(parser, TokenKind::Semicolon)?;
    let predicate = clause(parser, TokenKind::Semicolon)?;
    let update = clause(parser, TokenKind::CloseParen)?;
    let body = Box::new(parse_stmt(parser)?);

    Ok(Stmt::For(ForStmt { init, predicate, update, body, line }))
}

fn parse_stmt_list(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected `}`"),
                },
                parser.get_position(),
            ));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(statements)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.current_line();
    let body = parse_stmt_list(parser)?;

    Ok(Stmt::Block(BlockStmt { body, line }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let line = parser.advance().line();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt { value, line }))
}

/// `class Name (extends Parent)? { member* }`
pub fn parse_class_decl(parser: &mut Parser) -> Result<Class, Error> {
    let line = parser.expect(TokenKind::Class)?.line();
    let name = parser.expect(TokenKind::Identifier)?.value;

    let parent = if parser.current_token_kind() == TokenKind::Extends {
        parser.advance();
        Some(parser.expect(TokenKind::Identifier)?.value)
    } else {
        None
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut members = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: format!("expected `}}` to close class `{}`", name),
                },
                parser.get_position(),
            ));
        }
        members.push(parse_member(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Class {
        name,
        parent,
        members,
        filename: parser.file(),
        line,
    })
}

/// A field `Type name (= init)?;` or a method `Type name(formals) { body }`.
pub fn parse_member(parser: &mut Parser) -> Result<Member, Error> {
    let line = parser.current_line();
    let ty = parse_type(parser, BindingPower::Default)?;
    let name = parser.expect(TokenKind::Identifier)?.value;

    if parser.current_token_kind() != TokenKind::OpenParen {
        let init = if parser.current_token_kind() == TokenKind::Assignment {
            parser.advance();
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };
        parser.expect(TokenKind::Semicolon)?;

        return Ok(Member::Field(Field { name, ty, init, line }));
    }

    parser.advance();

    let mut formals = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let formal_line = parser.current_line();
        let formal_ty = parse_type(parser, BindingPower::Default)?;
        let formal_name = parser.expect(TokenKind::Identifier)?.value;
        formals.push(Formal { name: formal_name, ty: formal_ty, line: formal_line });

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt_list(parser)?;

    Ok(Member::Method(Method {
        name,
        return_type: ty,
        formals,
        body,
        line,
    }))
}
