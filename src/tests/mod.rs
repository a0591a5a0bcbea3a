mod concepts_io;
mod round_trip;
mod synthesis;
