mod sequence_number_tests;
