mod interp_demos;
mod parser_roundtrip;
