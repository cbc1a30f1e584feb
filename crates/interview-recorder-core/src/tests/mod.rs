mod interview;
mod support;
