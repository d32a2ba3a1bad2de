use crate::aiff::{ChunkReader, FORM_CHUNK_ID, FormType};
use crate::error::{AiffError, AiffResult};
use crate::prelude::*;

/// Reads the leading `FORM` header and its form type.
///
/// Nothing else in the file is looked at until this succeeds. An empty
/// file or a first chunk other than `FORM` is reported as `MissingForm`.
pub fn read_container<S: Read + Seek>(reader: &mut ChunkReader<S>) -> AiffResult<FormType> {
    let header = match reader.read_header()? {
        Some(header) if header.id.is(FORM_CHUNK_ID) => header,
        _ => return Err(AiffError::MissingForm),
    };

    let form_id = reader.read_form_type()?;
    let form = FormType::from_id(form_id).ok_or(AiffError::UnexpectedFormType(form_id))?;
    dprintln!("FORM size {} type {}", header.size, form.name());
    Ok(form)
}
