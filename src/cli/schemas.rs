use comfy_table::{Cell, Table};

use crate::cli::parse_entity;
use crate::error::Result;
use crate::schema::{schema, EntityType};

pub fn run(entity: Option<&str>) -> Result<()> {
    let entities: Vec<EntityType> = match entity {
        Some(key) => vec![parse_entity(key)?],
        None => EntityType::ALL.to_vec(),
    };
    for entity in entities {
        print_schema(entity);
    }
    Ok(())
}

fn print_schema(entity: EntityType) {
    let mut table = Table::new();
    table.set_header(vec![
        "Field", "Label", "Type", "Required", "Options", "Matches headers like",
    ]);
    for field in schema(entity).fields {
        table.add_row(vec![
            Cell::new(field.key),
            Cell::new(field.label),
            Cell::new(field.field_type.name()),
            Cell::new(if field.required { "yes" } else { "" }),
            Cell::new(field.options.join(", ")),
            Cell::new(field.synonyms.join(", ")),
        ]);
    }
    println!("{} ({})\n{table}", entity.name(), entity.key());
}
