mod helpers;

mod diff_props;
mod heap_walk;
