//! Builds the class map from a parsed program.
//!
//! Installs the built-in classes, links every declared class to its parent,
//! rejects malformed hierarchies and records fields and method signatures.

use std::rc::Rc;

use log::debug;

use crate::{
    ast::{
        ast::{Class, Program},
        types::{Type, ROOT_CLASS, STRING_CLASS},
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::class_tree::{ClassId, ClassMap, ClassTreeNode, MethodSig};

pub const BUILTIN_FILE: &str = "<builtin>";

fn sig(name: &str, return_type: Type, formals: Vec<Type>) -> MethodSig {
    MethodSig { name: name.to_string(), return_type, formals, line: 0 }
}

fn builtin_classes() -> Vec<(&'static str, Vec<MethodSig>)> {
    let string = Type::string;
    let text_io = || Type::named("TextIO");

    vec![
        (
            ROOT_CLASS,
            vec![
                sig("equals", Type::Boolean, vec![Type::Object]),
                sig("toString", string(), vec![]),
                sig("clone", Type::Object, vec![]),
            ],
        ),
        (
            STRING_CLASS,
            vec![
                sig("length", Type::Int, vec![]),
                sig("equals", Type::Boolean, vec![Type::Object]),
                sig("toString", string(), vec![]),
                sig("concat", string(), vec![string()]),
            ],
        ),
        (
            "TextIO",
            vec![
                sig("putString", text_io(), vec![string()]),
                sig("putInt", text_io(), vec![Type::Int]),
                sig("getString", string(), vec![]),
                sig("getInt", Type::Int, vec![]),
            ],
        ),
        (
            "Sys",
            vec![
                sig("exit", Type::Void, vec![Type::Int]),
                sig("time", Type::Int, vec![]),
                sig("random", Type::Int, vec![]),
            ],
        ),
    ]
}

fn class_position(class: &Class) -> Position {
    Position::new(0, class.line, Rc::clone(&class.filename))
}

fn install_builtins(classes: &mut ClassMap) {
    let file = Rc::new(String::from(BUILTIN_FILE));

    for (name, methods) in builtin_classes() {
        let mut node = ClassTreeNode::new(name, Rc::clone(&file), None);
        for method in methods {
            node.method_table_mut().add(method.name.clone(), method);
        }

        let id = classes.insert(node);
        if name != ROOT_CLASS {
            let root = classes.root();
            classes.node_mut(id).set_parent(root);
        }
    }
}

fn check_acyclic(classes: &ClassMap, id: ClassId, class: &Class) -> Result<(), Error> {
    let mut current = classes.node(id).parent();
    let mut steps = 0;

    while let Some(ancestor) = current {
        if ancestor == id || steps > classes.len() {
            return Err(Error::new(
                ErrorImpl::CyclicInheritance { class: class.name.clone() },
                class_position(class),
            ));
        }
        current = classes.node(ancestor).parent();
        steps += 1;
    }

    Ok(())
}

fn add_members(classes: &mut ClassMap, id: ClassId, class: &Class) -> Result<(), Error> {
    let node = classes.node_mut(id);

    for field in class.fields() {
        if node.var_table().lookup(&field.name).is_some() {
            return Err(Error::new(
                ErrorImpl::FieldAlreadyDeclared { class: class.name.clone(), field: field.name.clone() },
                Position::new(0, field.line, Rc::clone(&class.filename)),
            ));
        }
        node.var_table_mut().add(field.name.clone(), field.ty.clone());
    }

    for method in class.methods() {
        if node.method_table().lookup(&method.name).is_some() {
            return Err(Error::new(
                ErrorImpl::MethodAlreadyDeclared { class: class.name.clone(), method: method.name.clone() },
                Position::new(0, method.line, Rc::clone(&class.filename)),
            ));
        }
        node.method_table_mut().add(
            method.name.clone(),
            MethodSig {
                name: method.name.clone(),
                return_type: method.return_type.clone(),
                formals: method.formals.iter().map(|formal| formal.ty.clone()).collect(),
                line: method.line,
            },
        );
    }

    Ok(())
}

/// Builds the class hierarchy of `program`. Any malformed hierarchy aborts
/// with the first error found.
pub fn build_class_map(program: &Program) -> Result<ClassMap, Error> {
    let mut classes = ClassMap::new();
    install_builtins(&mut classes);
    let builtin_count = classes.len();

    for (index, class) in program.classes.iter().enumerate() {
        if let Some(existing) = classes.lookup(&class.name) {
            let error = if classes.node(existing).is_builtin() {
                ErrorImpl::BuiltinClassRedefined { class: class.name.clone() }
            } else {
                ErrorImpl::ClassAlreadyDeclared { class: class.name.clone() }
            };
            return Err(Error::new(error, class_position(class)));
        }

        classes.insert(ClassTreeNode::new(class.name.clone(), Rc::clone(&class.filename), Some(index)));
    }

    for (offset, class) in program.classes.iter().enumerate() {
        let id = ClassId(builtin_count + offset);
        let parent_name = class.parent.as_deref().unwrap_or(ROOT_CLASS);

        let parent = classes.lookup(parent_name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnknownParentClass { class: class.name.clone(), parent: parent_name.to_string() },
                class_position(class),
            )
        })?;
        classes.node_mut(id).set_parent(parent);
    }

    for (offset, class) in program.classes.iter().enumerate() {
        let id = ClassId(builtin_count + offset);
        check_acyclic(&classes, id, class)?;
        add_members(&mut classes, id, class)?;

        debug!(
            "registered class {} extends {} ({} fields, {} methods)",
            class.name,
            class.parent.as_deref().unwrap_or(ROOT_CLASS),
            class.fields().count(),
            class.methods().count()
        );
    }

    Ok(classes)
}
