use crate::domain::nvp::NvpRequest;
use crate::error::Result;
use std::io::Write;

/// Writes an NVP request as `field,value` CSV.
pub struct RequestWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RequestWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_request(&mut self, request: &NvpRequest) -> Result<()> {
        self.writer.write_record(["field", "value"])?;
        for (field, value) in request.iter() {
            self.writer.write_record([field, value.to_string().as_str()])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
