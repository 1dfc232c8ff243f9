pub(crate) mod allocator_tests;
