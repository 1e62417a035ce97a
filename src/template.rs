//! Blank import template: a CSV header row with the canonical columns of a schema.

use std::io::Write;

use crate::error::ImportResult;
use crate::schema::Schema;

/// Write the header row of `schema` to `writer`, in schema order.
///
/// Importing the template back yields zero rows.
pub fn write_template<W: Write>(schema: &Schema, writer: W) -> ImportResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(schema.field_names())?;
    wtr.flush()?;
    Ok(())
}
