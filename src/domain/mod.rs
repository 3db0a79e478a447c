// Domain layer: records fetched from Airtable and the ports the pipeline talks through.

pub mod model;
pub mod ports;
