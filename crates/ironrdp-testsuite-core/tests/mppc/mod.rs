mod round_trip;
mod session;
