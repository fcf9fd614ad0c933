/// Station directory primary keys are 64-bit integers.
pub type DbId = i64;
