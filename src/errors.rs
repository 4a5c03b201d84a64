//////////////////////////////////////////////////////////////////////
// use error chain so we can use Result<> everywhere
// for error handling

error_chain! {

    errors {

        // two line families that are parallel (or not families at all)
        InvalidDirectionPair(r: usize, s: usize) {
            description("invalid direction pair")
            display("invalid direction pair ({:}, {:}): need two distinct indices in 0..5", r, s)
        }

        // line levels whose rhombus corners (level + 1) don't fit in i64
        LevelOutOfRange(kr: i64, ks: i64) {
            description("line level out of range")
            display("line levels ({:}, {:}) out of range: corners need level + 1", kr, ks)
        }

        // bound so large that the tile count overflows
        SizeOutOfRange(size: usize) {
            description("tiling size out of range")
            display("tiling size {:} out of range: too many tiles to count", size)
        }

    }

}
