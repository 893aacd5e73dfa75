mod document_tests;
mod path_locator_tests;
mod property_tests;
mod stitch_spec_tests;
mod utils;
