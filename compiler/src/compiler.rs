use std::collections::HashMap;

use tracing::debug;

use crate::{
    classify::classify_field,
    emit::{EmitConfig, Emitter},
    error::KserialError,
    layout::LayoutPlan,
    parser::Parser,
    registry::TypeRegistry,
    tokenizer::tokenize_schema,
    types::{Declaration, EnumDecl, Schema, TableDecl},
};

/// Everything one successful compilation produced.
#[derive(Debug)]
pub struct Compilation {
    /// Generated source text for every declaration, in source order.
    pub output: String,
    pub schema: Schema,
    /// Layout of every table, in source order.
    pub plans:  Vec<LayoutPlan>,
    tags:       HashMap<String, String>,
}

impl Compilation {
    /// Name of the table whose deserializer is bound to `tag`.
    pub fn deserializer_for(&self, tag: &str) -> Option<&str> {
        self.tags.get(tag).map(String::as_str)
    }

    pub fn plan(&self, table: &str) -> Option<&LayoutPlan> {
        self.plans.iter().find(|p| p.table == table)
    }
}

/// Compile a schema to Rust with the default runtime path.
pub fn compile_schema(text: &str) -> Result<Compilation, KserialError> {
    compile_schema_with(text, &EmitConfig::default())
}

/// Compile a schema with the given emitter configuration.
///
/// Declarations are compiled in a single forward pass. Output is buffered and
/// only returned once every declaration has compiled, so a failure never
/// leaves partial output behind.
pub fn compile_schema_with(text: &str, config: &EmitConfig) -> Result<Compilation, KserialError> {
    let tokens = tokenize_schema(text);
    let mut compiler = Compiler::new(config.emitter());
    for declaration in Parser::new(text, &tokens) {
        compiler.compile_declaration(declaration?)?;
    }
    Ok(compiler.finish())
}

/// State owned by one compilation: the declared types, the tag bindings and
/// the output emitted so far.
pub struct Compiler {
    registry:     TypeRegistry,
    tags:         HashMap<String, String>,
    emitter:      Box<dyn Emitter>,
    chunks:       Vec<String>,
    plans:        Vec<LayoutPlan>,
    declarations: Vec<Declaration>,
}

impl Compiler {
    pub fn new(mut emitter: Box<dyn Emitter>) -> Compiler {
        let prelude = emitter.prelude();
        Compiler {
            registry: TypeRegistry::new(),
            tags: HashMap::new(),
            emitter,
            chunks: vec![prelude],
            plans: Vec::new(),
            declarations: Vec::new(),
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn compile_declaration(&mut self, declaration: Declaration) -> Result<(), KserialError> {
        match &declaration {
            Declaration::Enum(decl) => self.compile_enum(decl)?,
            Declaration::Table(decl) => self.compile_table(decl)?,
        }
        self.declarations.push(declaration);
        Ok(())
    }

    fn compile_enum(&mut self, decl: &EnumDecl) -> Result<(), KserialError> {
        if decl.values.len() as u64 > decl.repr.value_capacity() {
            return Err(KserialError::EnumOverflow {
                enum_name: decl.name.clone(),
                count:     decl.values.len(),
                repr:      decl.repr.keyword(),
            });
        }
        self.registry.declare_enum(decl);
        debug!(name = %decl.name, repr = decl.repr.keyword(), values = decl.values.len(), "compiled enum");
        self.chunks.push(self.emitter.emit_enum(decl)?);
        Ok(())
    }

    fn compile_table(&mut self, decl: &TableDecl) -> Result<(), KserialError> {
        // Registered before its fields resolve, so a table may refer to itself.
        self.registry.declare_table(decl);

        let members = decl
            .fields
            .iter()
            .map(|field| classify_field(&decl.name, field, &self.registry))
            .collect::<Result<Vec<_>, _>>()?;
        let plan = LayoutPlan::compute(&decl.name, &decl.tag, members);
        debug!(
            name = %decl.name,
            tag = %decl.tag,
            base_length = plan.base_length,
            variable_fields = plan.variable_fields.len(),
            "compiled table"
        );

        self.tags.insert(decl.tag.clone(), decl.name.clone());
        self.chunks.push(self.emitter.emit_table(decl, &plan)?);
        self.plans.push(plan);
        Ok(())
    }

    pub fn finish(mut self) -> Compilation {
        self.chunks.extend(self.emitter.finish());
        let mut output = self.chunks.join("\n\n");
        output.push('\n');
        Compilation {
            output,
            schema: Schema {
                declarations: self.declarations,
            },
            plans: self.plans,
            tags: self.tags,
        }
    }
}
