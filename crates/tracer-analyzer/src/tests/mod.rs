mod security_tests;
