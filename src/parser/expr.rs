use crate::{
    ast::{
        expressions::{BinaryOp, ExprId, ExprKind, UnaryOp},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprId, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() },
                    parser.get_position(),
                ))
            }
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let token = parser.current_token().clone();
    let kind = match token.kind {
        TokenKind::Number => match token.value.parse::<i32>() {
            Ok(value) => ExprKind::ConstInt(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value.clone() },
                    parser.get_position(),
                ))
            }
        },
        TokenKind::String => ExprKind::ConstString(token.value.clone()),
        TokenKind::True => ExprKind::ConstBool(true),
        TokenKind::False => ExprKind::ConstBool(false),
        TokenKind::Identifier => ExprKind::Var { receiver: None, name: token.value.clone() },
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value.clone() },
                parser.get_position(),
            ))
        }
    };

    parser.advance();
    Ok(parser.alloc(kind, token.line()))
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Dash => BinaryOp::Minus,
        TokenKind::Star => BinaryOp::Times,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Modulus,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEquals => BinaryOp::LessEquals,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        _ => return None,
    })
}

pub fn parse_binary_expr(parser: &mut Parser, left: ExprId, bp: BindingPower) -> Result<ExprId, Error> {
    let position = parser.get_position();
    let operator_token = parser.advance().clone();
    let op = binary_op(operator_token.kind).ok_or_else(|| {
        Error::new(ErrorImpl::UnexpectedToken { token: operator_token.value.clone() }, position)
    })?;

    let right = parse_expr(parser, bp)?;

    Ok(parser.alloc(ExprKind::Binary { op, left, right }, operator_token.line()))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let operator_token = parser.advance().clone();
    let op = match operator_token.kind {
        TokenKind::Dash => UnaryOp::Negate,
        TokenKind::Not => UnaryOp::Not,
        TokenKind::PlusPlus => UnaryOp::Increment { postfix: false },
        _ => UnaryOp::Decrement { postfix: false },
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(parser.alloc(ExprKind::Unary { op, operand }, operator_token.line()))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: ExprId, _bp: BindingPower) -> Result<ExprId, Error> {
    let operator_token = parser.advance().clone();
    let op = if operator_token.kind == TokenKind::PlusPlus {
        UnaryOp::Increment { postfix: true }
    } else {
        UnaryOp::Decrement { postfix: true }
    };

    Ok(parser.alloc(ExprKind::Unary { op, operand: left }, operator_token.line()))
}

/// `target = value`. The target node is rewritten into the assignment so it
/// keeps its id; assignment is right associative.
pub fn parse_assignment_expr(parser: &mut Parser, left: ExprId, _bp: BindingPower) -> Result<ExprId, Error> {
    let position = parser.get_position();
    parser.advance();

    let target = parser.expr_kind(left).clone();
    if !matches!(target, ExprKind::Var { .. } | ExprKind::ArrayElem { .. }) {
        return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, position));
    }

    let value = parse_expr(parser, BindingPower::Default)?;

    let assign = match target {
        ExprKind::Var { receiver, name } => ExprKind::Assign { receiver, name, value },
        ExprKind::ArrayElem { receiver, name, index } => ExprKind::ArrayAssign { receiver, name, index, value },
        _ => return Err(Error::new(ErrorImpl::InvalidAssignmentTarget, position)),
    };
    parser.rewrite(left, assign);

    Ok(left)
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// `name(args)` or `receiver.name(args)`. An unqualified call gets an implicit
/// `this` receiver.
pub fn parse_call_expr(parser: &mut Parser, left: ExprId, _bp: BindingPower) -> Result<ExprId, Error> {
    let position = parser.get_position();
    parser.advance();

    let (receiver, method) = match parser.expr_kind(left).clone() {
        ExprKind::Var { receiver, name } => (receiver, name),
        _ => return Err(Error::new(ErrorImpl::InvalidCallTarget, position)),
    };

    let mut args = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let receiver = match receiver {
        Some(receiver) => receiver,
        None => {
            let line = parser.expr_line(left);
            parser.alloc(ExprKind::Var { receiver: None, name: String::from("this") }, line)
        }
    };
    parser.rewrite(left, ExprKind::Dispatch { receiver, method, args });

    Ok(left)
}

/// `name[index]` or `receiver.name[index]`.
pub fn parse_index_expr(parser: &mut Parser, left: ExprId, _bp: BindingPower) -> Result<ExprId, Error> {
    let position = parser.get_position();
    parser.advance();

    let (receiver, name) = match parser.expr_kind(left).clone() {
        ExprKind::Var { receiver, name } => (receiver, name),
        _ => return Err(Error::new(ErrorImpl::InvalidIndexTarget, position)),
    };

    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    parser.rewrite(left, ExprKind::ArrayElem { receiver, name, index });

    Ok(left)
}

pub fn parse_member_expr(parser: &mut Parser, left: ExprId, _bp: BindingPower) -> Result<ExprId, Error> {
    parser.advance();
    let member = parser.expect(TokenKind::Identifier)?;
    let line = member.line();

    Ok(parser.alloc(ExprKind::Var { receiver: Some(left), name: member.value }, line))
}

pub fn parse_instanceof_expr(parser: &mut Parser, left: ExprId, _bp: BindingPower) -> Result<ExprId, Error> {
    let line = parser.advance().line();
    let target = parse_type(parser, BindingPower::Default)?;

    Ok(parser.alloc(ExprKind::InstanceOf { expr: left, target }, line))
}

/// `new C()` or `new T[size]`, the latter optionally followed by `[]` pairs
/// for the remaining dimensions.
pub fn parse_new_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let line = parser.advance().line();
    let name = parser.expect(TokenKind::Identifier)?.value;

    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();
        parser.expect(TokenKind::CloseParen)?;
        return Ok(parser.alloc(ExprKind::New { class: name }, line));
    }

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected `()` or an array size after `new`"),
        },
        parser.get_position(),
    );
    parser.expect_error(TokenKind::OpenBracket, Some(error))?;
    let size = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    let mut element = Type::named(&name);
    while parser.current_token_kind() == TokenKind::OpenBracket
        && parser.peek_kind(1) == TokenKind::CloseBracket
    {
        parser.advance();
        parser.advance();
        element = Type::array_of(element);
    }

    Ok(parser.alloc(ExprKind::NewArray { element, size }, line))
}

/// `cast(T, expr)`
pub fn parse_cast_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    let line = parser.advance().line();
    parser.expect(TokenKind::OpenParen)?;
    let target = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Comma)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(parser.alloc(ExprKind::Cast { target, expr }, line))
}
